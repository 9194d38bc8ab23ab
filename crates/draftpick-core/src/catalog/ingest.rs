// Source data loading and cleaning.
//
// Reads FantasyPros-style CSV exports: an ADP file (Player, AVG, POS) and a
// season performance file (Player, TTL, optional Bye and weekly columns
// "1".."18"). Rows that fail numeric coercion on a required field are
// dropped here and never reach the catalog.

use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Number of weekly scoring columns in a regular season.
pub const WEEKS_PER_SEASON: usize = 18;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One cleaned row of the ADP source.
#[derive(Debug, Clone, PartialEq)]
pub struct AdpRow {
    pub name: String,
    /// Average draft position. Always finite and > 0.
    pub adp: f64,
    /// Raw position label as published, e.g. "RB1".
    pub position_label: String,
}

/// One cleaned row of the performance source.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceRow {
    pub name: String,
    /// Season total fantasy points. Always finite.
    pub season_points: f64,
    pub bye_week: Option<u8>,
    /// Points per week; missing or non-numeric weeks are 0.0.
    pub weekly_points: [f64; WEEKS_PER_SEASON],
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("{path} is missing required column `{column}`")]
    MissingColumn { path: String, column: String },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

/// ADP CSV row. Extra columns (Rank, Team, per-site ADPs) are ignored.
/// AVG is typed so a non-numeric value fails the row.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawAdp {
    #[serde(default)]
    Player: String,
    AVG: f64,
    #[serde(default)]
    POS: String,
}

/// Performance CSV row. TTL and Bye stay as text so coercion is explicit;
/// weekly columns are read by header position, not through serde.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPerformance {
    #[serde(default)]
    Player: String,
    #[serde(default)]
    TTL: String,
    #[serde(default)]
    Bye: String,
}

const ADP_COLUMNS: &[&str] = &["Player", "AVG", "POS"];
const PERFORMANCE_COLUMNS: &[&str] = &["Player", "TTL"];

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a trimmed numeric cell. Empty, non-numeric and non-finite values
/// all yield None.
fn coerce_f64(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn coerce_bye(cell: &str) -> Option<u8> {
    coerce_f64(cell)
        .filter(|v| *v >= 1.0 && *v <= WEEKS_PER_SEASON as f64)
        .map(|v| v.round() as u8)
}

fn csv_reader<R: Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(rdr)
}

fn require_columns(
    headers: &csv::StringRecord,
    required: &[&str],
    source: &str,
) -> Result<(), IngestionError> {
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(IngestionError::MissingColumn {
                path: source.to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Header index of each weekly column "1".."18", if present.
fn week_columns(headers: &csv::StringRecord) -> [Option<usize>; WEEKS_PER_SEASON] {
    let mut columns = [None; WEEKS_PER_SEASON];
    for (week, slot) in columns.iter_mut().enumerate() {
        let label = (week + 1).to_string();
        *slot = headers.iter().position(|h| h == label);
    }
    columns
}

// ---------------------------------------------------------------------------
// Reader-based loaders (enable testing without temp files)
// ---------------------------------------------------------------------------

pub(crate) fn load_adp_from_reader<R: Read>(
    rdr: R,
    source: &str,
) -> Result<Vec<AdpRow>, IngestionError> {
    let mut reader = csv_reader(rdr);
    let headers = reader
        .headers()
        .map_err(|e| IngestionError::Csv {
            path: source.to_string(),
            source: e,
        })?
        .clone();
    require_columns(&headers, ADP_COLUMNS, source)?;

    let mut rows = Vec::new();
    let mut seen = HashSet::new();
    for result in reader.deserialize::<RawAdp>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed ADP row in {}: {}", source, e);
                continue;
            }
        };
        if raw.Player.is_empty() {
            debug!("skipping ADP row with empty player name");
            continue;
        }
        if !raw.AVG.is_finite() || raw.AVG <= 0.0 {
            warn!("skipping ADP entry for '{}': unusable AVG {}", raw.Player, raw.AVG);
            continue;
        }
        if !seen.insert(raw.Player.clone()) {
            warn!("duplicate ADP entry for '{}', keeping the first", raw.Player);
            continue;
        }
        rows.push(AdpRow {
            name: raw.Player,
            adp: raw.AVG,
            position_label: raw.POS,
        });
    }
    Ok(rows)
}

pub(crate) fn load_performance_from_reader<R: Read>(
    rdr: R,
    source: &str,
) -> Result<Vec<PerformanceRow>, IngestionError> {
    let mut reader = csv_reader(rdr);
    let headers = reader
        .headers()
        .map_err(|e| IngestionError::Csv {
            path: source.to_string(),
            source: e,
        })?
        .clone();
    require_columns(&headers, PERFORMANCE_COLUMNS, source)?;
    let weeks = week_columns(&headers);

    let mut rows = Vec::new();
    let mut seen = HashSet::new();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("skipping unreadable performance row in {}: {}", source, e);
                continue;
            }
        };
        let raw: RawPerformance = match record.deserialize(Some(&headers)) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed performance row in {}: {}", source, e);
                continue;
            }
        };

        if raw.Player.is_empty() {
            debug!("skipping performance row with empty player name");
            continue;
        }
        let Some(season_points) = coerce_f64(&raw.TTL) else {
            warn!(
                "skipping performance row for '{}': non-numeric TTL '{}'",
                raw.Player, raw.TTL
            );
            continue;
        };
        if !seen.insert(raw.Player.clone()) {
            warn!("duplicate performance entry for '{}', keeping the first", raw.Player);
            continue;
        }

        let mut weekly_points = [0.0; WEEKS_PER_SEASON];
        for (points, column) in weekly_points.iter_mut().zip(weeks.iter()) {
            *points = column
                .and_then(|idx| record.get(idx))
                .and_then(coerce_f64)
                .unwrap_or(0.0);
        }

        rows.push(PerformanceRow {
            name: raw.Player,
            season_points,
            bye_week: coerce_bye(&raw.Bye),
            weekly_points,
        });
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Load the ADP source from a CSV file.
pub fn load_adp(path: &Path) -> Result<Vec<AdpRow>, IngestionError> {
    let file = std::fs::File::open(path).map_err(|e| IngestionError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_adp_from_reader(file, &path.display().to_string())
}

/// Load the season performance source from a CSV file.
pub fn load_performance(path: &Path) -> Result<Vec<PerformanceRow>, IngestionError> {
    let file = std::fs::File::open(path).map_err(|e| IngestionError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_performance_from_reader(file, &path.display().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
