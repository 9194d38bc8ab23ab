// Player catalog: the joined, cleaned table of draftable players.
//
// Built once at startup from the ADP and performance sources. Records are
// immutable after construction; availability lives in the draft session.

pub mod ingest;
pub mod names;
pub mod position;

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::DataPaths;
use ingest::{AdpRow, IngestionError, PerformanceRow, WEEKS_PER_SEASON};
pub use position::Position;

// ---------------------------------------------------------------------------
// PlayerRecord
// ---------------------------------------------------------------------------

/// Index of a player within its catalog. Stable for the catalog's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PlayerId(pub usize);

/// A player present in both sources, with static per-player attributes.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    /// Raw ADP position label, e.g. "RB1".
    pub position_label: String,
    pub position: Position,
    /// Average draft position (lower = drafted earlier).
    pub adp: f64,
    pub season_points: f64,
    pub bye_week: Option<u8>,
    pub weekly_points: [f64; WEEKS_PER_SEASON],
    /// `season_points / adp`, fixed at construction.
    pub value_score: f64,
}

impl PlayerRecord {
    fn from_join(id: PlayerId, adp: AdpRow, performance: &PerformanceRow) -> Self {
        let position = Position::from_label(&adp.position_label);
        PlayerRecord {
            id,
            value_score: performance.season_points / adp.adp,
            name: adp.name,
            position_label: adp.position_label,
            position,
            adp: adp.adp,
            season_points: performance.season_points,
            bye_week: performance.bye_week,
            weekly_points: performance.weekly_points,
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The joined player table, in ADP source order.
///
/// There is no mutable access to records: `value_score` and every other
/// static attribute is fixed once the catalog is built.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    players: Vec<PlayerRecord>,
}

impl Catalog {
    /// Inner-join the two sources on exact player name.
    ///
    /// Order follows the ADP source, which is also the tie-break order for
    /// top-tier selection and ranking. Players missing from either source
    /// are excluded.
    pub fn join(adp: Vec<AdpRow>, performance: Vec<PerformanceRow>) -> Self {
        let by_name: HashMap<&str, &PerformanceRow> = performance
            .iter()
            .map(|row| (row.name.as_str(), row))
            .collect();

        let adp_count = adp.len();
        let mut players = Vec::with_capacity(adp_count.min(performance.len()));
        for row in adp {
            let Some(perf) = by_name.get(row.name.as_str()) else {
                debug!("'{}' has ADP but no performance row; excluded", row.name);
                continue;
            };
            let id = PlayerId(players.len());
            players.push(PlayerRecord::from_join(id, row, perf));
        }

        info!(
            "Joined catalog: {} players ({} ADP rows, {} performance rows)",
            players.len(),
            adp_count,
            performance.len()
        );

        Catalog { players }
    }

    /// Build a catalog directly from records (test fixtures, tools).
    ///
    /// Ids are reassigned to match positions in the given order.
    pub fn from_records(records: Vec<PlayerRecord>) -> Self {
        let players = records
            .into_iter()
            .enumerate()
            .map(|(idx, mut record)| {
                record.id = PlayerId(idx);
                record
            })
            .collect();
        Catalog { players }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn get(&self, id: PlayerId) -> Option<&PlayerRecord> {
        self.players.get(id.0)
    }

    /// Look up a player by exact name.
    pub fn by_name(&self, name: &str) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.name == name)
    }
}

/// Load both sources from disk and join them.
///
/// Any unreadable source, missing required column, or an empty join is an
/// error: no partial catalog is ever returned.
pub fn load_catalog(paths: &DataPaths) -> Result<Catalog, IngestionError> {
    let adp = ingest::load_adp(Path::new(&paths.adp))?;
    let performance = ingest::load_performance(Path::new(&paths.performance))?;

    if adp.is_empty() {
        return Err(IngestionError::Validation(format!(
            "ADP source {} produced zero valid rows",
            paths.adp
        )));
    }
    if performance.is_empty() {
        return Err(IngestionError::Validation(format!(
            "performance source {} produced zero valid rows",
            paths.performance
        )));
    }

    let catalog = Catalog::join(adp, performance);
    if catalog.is_empty() {
        return Err(IngestionError::Validation(
            "no player names matched between the ADP and performance sources".into(),
        ));
    }
    Ok(catalog)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
