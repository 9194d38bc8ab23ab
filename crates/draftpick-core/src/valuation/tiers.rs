// Top-tier derivation.
//
// For each tracked position, the N highest value-score players in the
// initial catalog. Computed once per draft session, before anyone is
// drafted; membership never changes afterwards.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::{Catalog, PlayerId, Position};

/// Default tier sizes: QB 12, RB 25, WR 25, TE 12.
pub const DEFAULT_TIER_SIZES: &[(Position, usize)] = &[
    (Position::Quarterback, 12),
    (Position::RunningBack, 25),
    (Position::WideReceiver, 25),
    (Position::TightEnd, 12),
];

/// Build the default position -> tier size map.
pub fn default_tier_sizes() -> BTreeMap<Position, usize> {
    DEFAULT_TIER_SIZES.iter().copied().collect()
}

/// The fixed top tier for one position.
#[derive(Debug, Clone, Serialize)]
pub struct TopTierSet {
    pub position: Position,
    /// Members ordered by descending value score.
    pub members: Vec<PlayerId>,
}

impl TopTierSet {
    /// Number of players in the tier (T). May be below the configured size
    /// when the catalog has fewer players at the position.
    pub fn total(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.members.contains(&id)
    }
}

/// Top tiers for every tracked position, keyed in position order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TopTiers {
    tiers: BTreeMap<Position, TopTierSet>,
}

impl TopTiers {
    /// Select the top `size` players by value score at each position.
    ///
    /// Ties keep catalog (ADP source) order via a stable sort.
    pub(crate) fn derive(catalog: &Catalog, sizes: &BTreeMap<Position, usize>) -> Self {
        let mut tiers = BTreeMap::new();

        for (&position, &size) in sizes {
            let mut candidates: Vec<(PlayerId, f64)> = catalog
                .players()
                .iter()
                .filter(|p| p.position == position)
                .map(|p| (p.id, p.value_score))
                .collect();

            candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
            candidates.truncate(size);

            if candidates.len() < size {
                warn!(
                    "only {} {} players available for a top tier of {}",
                    candidates.len(),
                    position,
                    size
                );
            }
            debug!("{} top tier: {} players", position, candidates.len());

            tiers.insert(
                position,
                TopTierSet {
                    position,
                    members: candidates.into_iter().map(|(id, _)| id).collect(),
                },
            );
        }

        TopTiers { tiers }
    }

    pub fn get(&self, position: Position) -> Option<&TopTierSet> {
        self.tiers.get(&position)
    }

    pub fn is_tracked(&self, position: Position) -> bool {
        self.tiers.contains_key(&position)
    }

    /// Iterate tiers in position order (QB, RB, WR, TE, ...).
    pub fn iter(&self) -> impl Iterator<Item = &TopTierSet> {
        self.tiers.values()
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.tiers.keys().copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::test_support::{catalog_of, player};

    #[test]
    fn default_sizes() {
        let sizes = default_tier_sizes();
        assert_eq!(sizes.get(&Position::Quarterback), Some(&12));
        assert_eq!(sizes.get(&Position::RunningBack), Some(&25));
        assert_eq!(sizes.get(&Position::WideReceiver), Some(&25));
        assert_eq!(sizes.get(&Position::TightEnd), Some(&12));
        assert_eq!(sizes.len(), 4);
    }

    #[test]
    fn selects_highest_value_scores() {
        let catalog = catalog_of(vec![
            player("QB Low", "QB1", 100.0, 10.0),  // 10
            player("QB High", "QB2", 300.0, 10.0), // 30
            player("QB Mid", "QB3", 200.0, 10.0),  // 20
            player("RB", "RB1", 500.0, 1.0),
        ]);
        let mut sizes = BTreeMap::new();
        sizes.insert(Position::Quarterback, 2);

        let tiers = TopTiers::derive(&catalog, &sizes);
        let qb = tiers.get(Position::Quarterback).unwrap();
        let names: Vec<&str> = qb
            .members
            .iter()
            .map(|id| catalog.get(*id).unwrap().name.as_str())
            .collect();
        assert_eq!(names, vec!["QB High", "QB Mid"]);
        assert_eq!(qb.total(), 2);
        assert!(!tiers.is_tracked(Position::RunningBack));
    }

    #[test]
    fn ties_broken_by_source_order() {
        let catalog = catalog_of(vec![
            player("First", "TE1", 100.0, 10.0),
            player("Second", "TE2", 100.0, 10.0),
            player("Third", "TE3", 100.0, 10.0),
        ]);
        let mut sizes = BTreeMap::new();
        sizes.insert(Position::TightEnd, 2);

        let tiers = TopTiers::derive(&catalog, &sizes);
        let te = tiers.get(Position::TightEnd).unwrap();
        assert_eq!(te.members, vec![PlayerId(0), PlayerId(1)]);
    }

    #[test]
    fn short_position_yields_smaller_tier() {
        let catalog = catalog_of(vec![player("Lone WR", "WR1", 100.0, 5.0)]);
        let tiers = TopTiers::derive(&catalog, &default_tier_sizes());
        assert_eq!(tiers.get(Position::WideReceiver).unwrap().total(), 1);
        // Tracked even when empty
        assert_eq!(tiers.get(Position::Quarterback).unwrap().total(), 0);
    }

    #[test]
    fn iteration_is_in_position_order() {
        let catalog = catalog_of(vec![]);
        let tiers = TopTiers::derive(&catalog, &default_tier_sizes());
        let positions: Vec<Position> = tiers.positions().collect();
        assert_eq!(
            positions,
            vec![
                Position::Quarterback,
                Position::RunningBack,
                Position::WideReceiver,
                Position::TightEnd
            ]
        );
    }
}
