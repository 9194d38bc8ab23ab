// Weekly-performance analytics: consistency, boom and bust rates.

use serde::Serialize;

use crate::catalog::PlayerRecord;

/// A week at or above this multiple of the player's mean is a boom.
pub const BOOM_FACTOR: f64 = 1.2;
/// A week at or below this multiple of the player's mean is a bust.
pub const BUST_FACTOR: f64 = 0.8;

/// Derived week-to-week statistics for one player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerAnalytics {
    pub mean: f64,
    /// Sample standard deviation of weekly points.
    pub consistency: f64,
    /// Currently identical to `consistency`.
    pub risk: f64,
    pub boom_rate: f64,
    pub bust_rate: f64,
}

impl PlayerAnalytics {
    pub fn for_player(player: &PlayerRecord) -> Self {
        Self::from_weeks(&player.weekly_points)
    }

    /// Compute analytics over a slice of weekly scores.
    ///
    /// Fewer than two weeks gives a consistency of 0.0. Boom and bust rates
    /// are 0.0 when the mean is not positive (no meaningful baseline).
    pub fn from_weeks(weeks: &[f64]) -> Self {
        if weeks.is_empty() {
            return PlayerAnalytics {
                mean: 0.0,
                consistency: 0.0,
                risk: 0.0,
                boom_rate: 0.0,
                bust_rate: 0.0,
            };
        }

        let n = weeks.len() as f64;
        let mean = weeks.iter().sum::<f64>() / n;

        let consistency = if weeks.len() < 2 {
            0.0
        } else {
            let sum_sq: f64 = weeks.iter().map(|w| (w - mean).powi(2)).sum();
            (sum_sq / (n - 1.0)).sqrt()
        };

        let (boom_rate, bust_rate) = if mean > 0.0 {
            let booms = weeks.iter().filter(|w| **w >= BOOM_FACTOR * mean).count();
            let busts = weeks.iter().filter(|w| **w <= BUST_FACTOR * mean).count();
            (booms as f64 / n, busts as f64 / n)
        } else {
            (0.0, 0.0)
        };

        PlayerAnalytics {
            mean,
            consistency,
            risk: consistency,
            boom_rate,
            bust_rate,
        }
    }
}
