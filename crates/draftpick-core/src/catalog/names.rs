// Player name normalization for external lookups.
//
// The catalog join uses exact (trimmed) names; this normalization is only
// applied where a source outside our control spells names differently, such
// as the photo directory.

/// Generational suffixes dropped during normalization.
const SUFFIXES: &[&str] = &["jr", "sr", "ii", "iii", "iv", "v"];

/// Normalize a player name for lookup keys.
///
/// - trims and collapses internal whitespace
/// - drops punctuation except hyphens and apostrophes ("A.J." -> "AJ")
/// - drops a trailing generational suffix ("Jr.", "III")
///
/// Case is preserved; callers that need case-insensitive keys lowercase
/// the result themselves.
pub fn normalize_name(input: &str) -> String {
    let mut words: Vec<String> = input
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '\'')
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect();

    if words.len() > 1 {
        let last_is_suffix = words
            .last()
            .is_some_and(|w| SUFFIXES.contains(&w.to_lowercase().as_str()));
        if last_is_suffix {
            words.pop();
        }
    }

    words.join(" ")
}
