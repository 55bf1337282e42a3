//! Small text helpers used when phrasing diagnostics.

use glob::{MatchOptions, Pattern};

/// Minimum similarity for a "did you mean" suggestion.
pub const DEFAULT_HINT_CUTOFF: f64 = 0.6;

/// Returns up to `max` candidates similar to `query`, best first.
///
/// Similarity is normalized Damerau-Levenshtein in `[0, 1]`; candidates below
/// `cutoff` are dropped. Equal scores are ordered with the lexicographically
/// greater candidate first so results are deterministic.
///
/// # Examples
///
/// ```
/// use config_conformance_core::{DEFAULT_HINT_CUTOFF, closest_matches};
///
/// let keys = ["output", "include", "exclude"];
/// assert_eq!(closest_matches("outpt", keys, 1, DEFAULT_HINT_CUTOFF), vec!["output"]);
/// assert!(closest_matches("zzz", keys, 1, DEFAULT_HINT_CUTOFF).is_empty());
/// ```
pub fn closest_matches<'a, I>(query: &str, candidates: I, max: usize, cutoff: f64) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scored: Vec<(f64, &str)> = candidates
        .into_iter()
        .map(|candidate| (strsim::normalized_damerau_levenshtein(query, candidate), candidate))
        .filter(|(score, _)| *score >= cutoff)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| b.1.cmp(a.1)));

    scored
        .into_iter()
        .take(max)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

/// Case-sensitive shell-style match of a whole path against `pattern`.
///
/// `*` also crosses `.` and `/`. An invalid pattern never matches.
pub fn glob_match(path: &str, pattern: &str) -> bool {
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };
    Pattern::new(pattern).is_ok_and(|compiled| compiled.matches_with(path, options))
}

/// `"s"` unless `count` is exactly one.
pub fn plural_suffix(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}
