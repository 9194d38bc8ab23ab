// The draft session: catalog, fixed top tiers, live availability, and the
// most recent ranking.
//
// All mutation goes through `draft` / `draft_player`, and each successful
// draft recomputes the ranking before returning, so `ranking()` never shows
// stale scores.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::query::match_players;
use super::Availability;
use crate::catalog::{Catalog, PlayerId, PlayerRecord, Position};
use crate::valuation::scarcity::{rank, Ranking, ScarcityMultipliers};
use crate::valuation::tiers::TopTiers;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of a draft attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DraftOutcome {
    /// Exactly one available player matched and is now drafted.
    Drafted {
        id: PlayerId,
        name: String,
        position_label: String,
        pick_number: usize,
    },
    /// Exactly one player matched, but they were already drafted. Nothing changed.
    AlreadyDrafted { id: PlayerId, name: String },
    /// No player matched the query.
    NotFound { query: String },
    /// More than one player matched; the operator must be more specific.
    Ambiguous { query: String, matches: Vec<String> },
}

impl DraftOutcome {
    /// Whether this outcome changed session state.
    pub fn is_drafted(&self) -> bool {
        matches!(self, DraftOutcome::Drafted { .. })
    }
}

impl fmt::Display for DraftOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftOutcome::Drafted { name, .. } => write!(f, "{name} has been drafted."),
            DraftOutcome::AlreadyDrafted { name, .. } => {
                write!(f, "{name} has already been drafted.")
            }
            DraftOutcome::NotFound { query } => {
                write!(f, "Player '{query}' not found. Please try again.")
            }
            DraftOutcome::Ambiguous { query, matches } => write!(
                f,
                "Multiple players match '{query}' ({}). Please be more specific.",
                matches.join(", ")
            ),
        }
    }
}

/// One line of the drafted-players log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftedEntry {
    /// 1-based pick order within the session.
    pub pick_number: usize,
    pub player_id: PlayerId,
    pub name: String,
    pub position_label: String,
    pub position: Position,
    /// The player's adjusted score in the ranking shown when they were picked.
    pub adjusted_value_at_pick: f64,
    pub drafted_at: DateTime<Local>,
}

// ---------------------------------------------------------------------------
// DraftSession
// ---------------------------------------------------------------------------

/// Owns everything that changes during a draft.
#[derive(Debug)]
pub struct DraftSession {
    catalog: Arc<Catalog>,
    tiers: TopTiers,
    availability: Availability,
    ranking: Ranking,
    drafted: Vec<DraftedEntry>,
}

impl DraftSession {
    /// Start a session on a freshly built catalog.
    ///
    /// Top tiers are derived here, once, while every player is available.
    /// There is no way to re-derive them later in the session.
    pub fn new(catalog: Catalog, tier_sizes: &BTreeMap<Position, usize>) -> Self {
        let catalog = Arc::new(catalog);
        let tiers = TopTiers::derive(&catalog, tier_sizes);
        let availability = Availability::all(catalog.len());
        let ranking = rank(&catalog, &availability, &tiers, &ScarcityMultipliers::default());

        info!(
            "Draft session started: {} players, {} tracked positions",
            catalog.len(),
            tier_sizes.len()
        );

        DraftSession {
            catalog,
            tiers,
            availability,
            ranking,
            drafted: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Shared handle to the immutable catalog.
    pub fn catalog_arc(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    pub fn top_tiers(&self) -> &TopTiers {
        &self.tiers
    }

    /// The ranking as of the last successful draft (or session start).
    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }

    /// Drafted players in pick order.
    pub fn drafted(&self) -> &[DraftedEntry] {
        &self.drafted
    }

    pub fn is_available(&self, id: PlayerId) -> bool {
        self.availability.is_available(id)
    }

    pub fn available_count(&self) -> usize {
        self.availability.available_count()
    }

    /// Draft by name query. See [`match_players`] for the matching policy.
    pub fn draft(&mut self, query: &str) -> DraftOutcome {
        let matches = match_players(&self.catalog, query);
        let target = match matches.as_slice() {
            [] => {
                debug!("Draft query '{}' matched nobody", query);
                return DraftOutcome::NotFound {
                    query: query.trim().to_string(),
                };
            }
            [single] => single.id,
            many => {
                debug!("Draft query '{}' matched {} players", query, many.len());
                return DraftOutcome::Ambiguous {
                    query: query.trim().to_string(),
                    matches: many.iter().map(|p| p.name.clone()).collect(),
                };
            }
        };
        self.draft_player(target)
    }

    /// Draft a specific player by id (dashboard selection).
    pub fn draft_player(&mut self, id: PlayerId) -> DraftOutcome {
        let Some(record) = self.catalog.get(id) else {
            warn!("Draft requested for unknown player id {}", id.0);
            return DraftOutcome::NotFound {
                query: format!("#{}", id.0),
            };
        };

        if !self.availability.mark_drafted(id) {
            info!("{} was already drafted; nothing changed", record.name);
            return DraftOutcome::AlreadyDrafted {
                id,
                name: record.name.clone(),
            };
        }

        let entry = self.log_entry(record);
        let outcome = DraftOutcome::Drafted {
            id,
            name: entry.name.clone(),
            position_label: entry.position_label.clone(),
            pick_number: entry.pick_number,
        };
        info!(
            "Pick {}: {} ({}) at adjusted value {:.3}",
            entry.pick_number, entry.name, entry.position_label, entry.adjusted_value_at_pick
        );
        self.drafted.push(entry);

        self.recompute();
        outcome
    }

    fn log_entry(&self, record: &PlayerRecord) -> DraftedEntry {
        let adjusted_value_at_pick = self
            .ranking
            .players
            .iter()
            .find(|p| p.id == record.id)
            .map(|p| p.adjusted_value_score)
            .unwrap_or(record.value_score);

        DraftedEntry {
            pick_number: self.drafted.len() + 1,
            player_id: record.id,
            name: record.name.clone(),
            position_label: record.position_label.clone(),
            position: record.position,
            adjusted_value_at_pick,
            drafted_at: Local::now(),
        }
    }

    /// Re-run the ranking engine against current availability.
    fn recompute(&mut self) {
        let next = rank(
            &self.catalog,
            &self.availability,
            &self.tiers,
            &self.ranking.multipliers,
        );

        for status in &next.tiers {
            let was_depleted = self
                .ranking
                .tier(status.position)
                .is_some_and(|prev| prev.depleted);
            if status.depleted && !was_depleted {
                warn!(
                    "{} top tier fully drafted; multiplier frozen at {:.4}",
                    status.position, status.multiplier
                );
            }
        }

        self.ranking = next;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
