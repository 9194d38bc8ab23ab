// Scarcity-adjusted ranking engine.
//
// Every available player's priority is their static value score scaled by a
// position-wide multiplier that grows as that position's top tier is
// drafted:
//
//     multiplier_p = (T_p / R_p)^2
//
// where T_p is the tier size and R_p the number of tier members still
// available. The multiplier applies to every available player at the
// position, not only tier members. Positions without a tier use 1.0.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::{Catalog, PlayerId, Position};
use crate::draft::Availability;
use crate::valuation::tiers::TopTiers;

/// Exponent applied to the tier depletion ratio.
pub const SCARCITY_EXPONENT: i32 = 2;

// ---------------------------------------------------------------------------
// Multiplier table
// ---------------------------------------------------------------------------

/// Per-position multipliers produced by one ranking pass.
///
/// The only state carried from one pass to the next: when a tier is fully
/// drafted its last multiplier is reused instead of dividing by zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScarcityMultipliers(BTreeMap<Position, f64>);

impl ScarcityMultipliers {
    /// Multiplier in effect for a position (1.0 when untracked or unset).
    pub fn get(&self, position: Position) -> f64 {
        self.0.get(&position).copied().unwrap_or(1.0)
    }

    fn last(&self, position: Position) -> Option<f64> {
        self.0.get(&position).copied()
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Depletion state of one position's top tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierStatus {
    pub position: Position,
    /// Tier size (T).
    pub total: usize,
    /// Tier members still available (R).
    pub remaining: usize,
    /// Multiplier applied to this position in the pass.
    pub multiplier: f64,
    /// Every tier member is gone; the multiplier is frozen.
    pub depleted: bool,
}

impl TierStatus {
    pub fn drafted(&self) -> usize {
        self.total - self.remaining
    }

    /// Fraction of the tier still available, 0.0..=1.0 (0.0 for an empty tier).
    pub fn remaining_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.remaining as f64 / self.total as f64
        }
    }

    /// Whether the remaining count is at or below the warning threshold.
    pub fn is_low(&self, threshold: usize) -> bool {
        self.total > 0 && self.remaining <= threshold
    }
}

/// One available player in a ranking pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPlayer {
    pub id: PlayerId,
    pub name: String,
    pub position_label: String,
    pub position: Position,
    pub value_score: f64,
    pub adjusted_value_score: f64,
    pub in_top_tier: bool,
}

/// The result of a ranking pass: available players best-first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ranking {
    pub players: Vec<RankedPlayer>,
    /// One entry per tracked position, in position order.
    pub tiers: Vec<TierStatus>,
    pub multipliers: ScarcityMultipliers,
}

impl Ranking {
    /// The first `n` ranked players (fewer if the pool is smaller).
    pub fn top(&self, n: usize) -> &[RankedPlayer] {
        &self.players[..n.min(self.players.len())]
    }

    pub fn tier(&self, position: Position) -> Option<&TierStatus> {
        self.tiers.iter().find(|t| t.position == position)
    }

    /// Tracked positions whose remaining tier count is at or below `threshold`.
    pub fn low_tiers(&self, threshold: usize) -> Vec<&TierStatus> {
        self.tiers.iter().filter(|t| t.is_low(threshold)).collect()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Rank all available players by scarcity-adjusted value.
///
/// 1. For each tracked position, count available tier members (R).
/// 2. R == 0: reuse the multiplier from `previous` (1.0 if none).
///    Otherwise multiplier = (T / R)^2.
/// 3. Every available player's adjusted score = value score x multiplier of
///    their position (1.0 for untracked positions).
/// 4. Stable sort descending; ties keep catalog order.
///
/// Pure: the catalog and availability are only read, and the result
/// depends on nothing but the inputs.
pub fn rank(
    catalog: &Catalog,
    availability: &Availability,
    tiers: &TopTiers,
    previous: &ScarcityMultipliers,
) -> Ranking {
    let mut multipliers = BTreeMap::new();
    let mut statuses = Vec::new();

    for tier in tiers.iter() {
        let total = tier.total();
        let remaining = tier
            .members
            .iter()
            .filter(|id| availability.is_available(**id))
            .count();

        let multiplier = if remaining == 0 {
            previous.last(tier.position).unwrap_or(1.0)
        } else {
            (total as f64 / remaining as f64).powi(SCARCITY_EXPONENT)
        };

        multipliers.insert(tier.position, multiplier);
        statuses.push(TierStatus {
            position: tier.position,
            total,
            remaining,
            multiplier,
            depleted: remaining == 0,
        });
    }
    let multipliers = ScarcityMultipliers(multipliers);

    let mut players: Vec<RankedPlayer> = catalog
        .players()
        .iter()
        .filter(|p| availability.is_available(p.id))
        .map(|p| RankedPlayer {
            id: p.id,
            name: p.name.clone(),
            position_label: p.position_label.clone(),
            position: p.position,
            value_score: p.value_score,
            adjusted_value_score: p.value_score * multipliers.get(p.position),
            in_top_tier: tiers.get(p.position).is_some_and(|t| t.contains(p.id)),
        })
        .collect();

    players.sort_by(|a, b| b.adjusted_value_score.total_cmp(&a.adjusted_value_score));

    Ranking {
        players,
        tiers: statuses,
        multipliers,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
