// Football positions and position-label parsing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base fantasy football positions.
///
/// Declaration order doubles as display order (QB first), so the derived
/// `Ord` gives a deterministic iteration order for per-position maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    Kicker,
    Defense,
    Unknown,
}

impl Position {
    /// Parse a bare position abbreviation ("QB", "rb", "DST").
    ///
    /// Accepts the common aliases used by ADP sites:
    /// - "PK" -> Kicker
    /// - "DEF", "D/ST", "D" -> Defense
    ///
    /// Returns None for anything else; "UNK" is not accepted as input.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" | "PK" => Some(Position::Kicker),
            "DST" | "DEF" | "D/ST" | "D" => Some(Position::Defense),
            _ => None,
        }
    }

    /// Derive the base position from a raw ADP position label.
    ///
    /// The first run of ASCII letters is the position ("RB1" -> RB,
    /// "WR12" -> WR, "DST3" -> DST). Labels without letters, or whose
    /// letters are not a known position, map to `Unknown`.
    pub fn from_label(label: &str) -> Self {
        let letters: String = label
            .trim()
            .chars()
            .skip_while(|c| !c.is_ascii_alphabetic())
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();

        if letters.is_empty() {
            return Position::Unknown;
        }
        Position::from_str_pos(&letters).unwrap_or(Position::Unknown)
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "DST",
            Position::Unknown => "UNK",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}
