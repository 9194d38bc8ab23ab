// Valuation engine: top tiers, scarcity ranking, weekly analytics.

pub mod analytics;
pub mod scarcity;
pub mod tiers;
