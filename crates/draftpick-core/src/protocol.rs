// Published view of the draft state.
//
// A `DraftSnapshot` is built only from a fully recomputed session, so any
// reader (dashboard, viewer feed) sees a consistent ranking.

use serde::Serialize;

use crate::draft::{DraftSession, DraftedEntry};
use crate::valuation::scarcity::{RankedPlayer, TierStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DraftSnapshot {
    /// Number of successful picks so far; increases with every publish.
    pub pick_count: usize,
    pub available_count: usize,
    /// Available players, best-first.
    pub ranking: Vec<RankedPlayer>,
    /// Tier depletion per tracked position, in position order.
    pub tiers: Vec<TierStatus>,
    pub drafted: Vec<DraftedEntry>,
}

impl DraftSnapshot {
    pub fn from_session(session: &DraftSession) -> Self {
        let ranking = session.ranking();
        DraftSnapshot {
            pick_count: session.drafted().len(),
            available_count: session.available_count(),
            ranking: ranking.players.clone(),
            tiers: ranking.tiers.clone(),
            drafted: session.drafted().to_vec(),
        }
    }

    /// Tiers at or below the warning threshold that still have members.
    pub fn low_tiers(&self, threshold: usize) -> Vec<&TierStatus> {
        self.tiers.iter().filter(|t| t.is_low(threshold)).collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
