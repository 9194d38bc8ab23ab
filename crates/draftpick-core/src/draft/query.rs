// Draft query matching.
//
// Policy: case-insensitive substring match on the player's name, run over
// the whole catalog including players already drafted. No edit-distance
// or token matching; a query that is a substring of two names is ambiguous
// even when it equals one of them exactly.

use crate::catalog::{Catalog, PlayerRecord};

/// All catalog players whose name contains `query`, ignoring case.
///
/// A blank query matches nothing.
pub fn match_players<'a>(catalog: &'a Catalog, query: &str) -> Vec<&'a PlayerRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    catalog
        .players()
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .collect()
}
