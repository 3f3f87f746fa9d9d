//! Answer option normalisation.
//!
//! Options are compared case-insensitively but keep the casing of the first
//! spelling that was seen.

use std::collections::HashSet;

/// Trims surrounding whitespace. A missing value normalises to `""`.
pub fn normalize<S: AsRef<str>>(value: Option<S>) -> String {
    match value {
        None => String::new(),
        Some(value) => value.as_ref().trim().to_string(),
    }
}

/// Shorthand for [`normalize`] on a value that is known to be present.
pub fn normalize_str(value: &str) -> String {
    normalize(Some(value))
}

/// Normalises every option, drops the empty ones and removes case-insensitive
/// duplicates, keeping the first occurrence in input order.
pub fn dedupe<I, S>(options: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for option in options {
        let normalized = normalize_str(option.as_ref());
        if normalized.is_empty() {
            continue;
        }
        if !seen.insert(normalized.to_lowercase()) {
            continue;
        }
        unique.push(normalized);
    }
    unique
}
