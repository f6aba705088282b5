//! DOI normalization
//!
//! Providers deliver DOIs as bare values, `doi:` strings, resolver URLs,
//! with trailing punctuation or percent-encoded separators. Everything is
//! reduced to one lower-case canonical form; values that cannot be brought
//! into that form are rejected rather than guessed at.

use crate::text::clean_text;

/// Prefixes stripped from a lower-cased DOI, checked in this order
pub const DOI_PREFIXES: [&str; 7] = [
    "doi:",
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "doi.org/",
    "dx.doi.org/",
];

/// Characters trimmed from both ends after prefix removal
pub const DOI_TRIM_CHARS: [char; 11] = [' ', '.', ';', ',', ':', ')', ']', '}', '>', '"', '\''];

/// Percent-encoded forms of `/`
const ENCODED_SEPARATORS: [&str; 2] = ["%2f", "%2F"];

/// Shortest accepted DOI length in characters
pub const DOI_MIN_LEN: usize = 5;
/// Longest accepted DOI length in characters
pub const DOI_MAX_LEN: usize = 300;

/// Normalize a raw DOI value
///
/// Returns `None` when the value is empty or does not look like a DOI
/// (`10.` prefix, at least one `/`, 5 to 300 characters).
pub fn normalize_doi(value: &str) -> Option<String> {
    let text = clean_text(value);
    if text.is_empty() {
        return None;
    }

    let lowered = text.to_lowercase();
    let without_prefix = strip_doi_prefix(&lowered);

    let trimmed = without_prefix.trim_matches(|c: char| DOI_TRIM_CHARS.contains(&c));
    let mut compact = trimmed.replace(' ', "");
    for encoded in ENCODED_SEPARATORS {
        compact = compact.replace(encoded, "/");
    }

    if is_canonical_shape(&compact) {
        Some(compact)
    } else {
        None
    }
}

/// Check whether a raw value normalizes to a DOI
pub fn is_valid_doi(value: &str) -> bool {
    normalize_doi(value).is_some()
}

fn strip_doi_prefix(lowered: &str) -> &str {
    for prefix in DOI_PREFIXES {
        if let Some(stripped) = lowered.strip_prefix(prefix) {
            return stripped;
        }
    }
    lowered
}

fn is_canonical_shape(candidate: &str) -> bool {
    if candidate.is_empty() || !candidate.contains('/') || !candidate.starts_with("10.") {
        return false;
    }
    let len = candidate.chars().count();
    (DOI_MIN_LEN..=DOI_MAX_LEN).contains(&len)
}
