//! Text cleanup and pipe-list normalization

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use unicode_general_category::{get_general_category, GeneralCategory};

/// Separator used by every multi-valued text column
pub const PIPE: char = '|';

/// Clean a raw text value
///
/// - Removes control, format and private-use characters anywhere in the text
/// - Trims surrounding whitespace
pub fn clean_text(value: &str) -> String {
    let cleaned: String = value.chars().filter(|c| !is_other_char(*c)).collect();
    cleaned.trim().to_string()
}

/// Clean and lower-case a text value
pub fn fold_text(value: &str) -> String {
    clean_text(value).to_lowercase()
}

/// Normalize a single token: clean, collapse whitespace, lower-case
///
/// Returns `None` when nothing is left.
pub fn normalize_token(value: &str) -> Option<String> {
    let compact = collapse_whitespace(&clean_text(value));
    if compact.is_empty() {
        None
    } else {
        Some(compact.to_lowercase())
    }
}

/// Split a pipe-delimited value into normalized, non-empty tokens
pub fn split_pipe_tokens(value: &str) -> Vec<String> {
    value.split(PIPE).filter_map(normalize_token).collect()
}

/// Check whether a pipe-delimited value contains `word` as a token
///
/// A token matches when it equals `word` or when one of its whitespace
/// separated words does ("review article" contains "review", "interview"
/// does not). Comparison is case-insensitive.
pub fn has_pipe_token(value: &str, word: &str) -> bool {
    let word = word.to_lowercase();
    split_pipe_tokens(value)
        .iter()
        .any(|token| token == &word || token.split(' ').any(|part| part == word))
}

/// Alias and drop rules for a pipe-delimited column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeRules {
    /// Token aliases; mapping a token to an empty string drops it
    pub alias: BTreeMap<String, String>,
    /// Tokens removed after aliasing
    pub drop: Vec<String>,
}

impl PipeRules {
    /// Prepare the rules for repeated application
    pub fn normalizer(&self) -> PipeNormalizer {
        let alias = self
            .alias
            .iter()
            .map(|(key, value)| {
                let key = normalize_token(key).unwrap_or_else(|| key.clone());
                (key, normalize_token(value))
            })
            .collect();
        let drop = self.drop.iter().filter_map(|d| normalize_token(d)).collect();
        PipeNormalizer { alias, drop }
    }
}

/// Prepared form of [`PipeRules`] with normalized keys
#[derive(Debug, Clone, Default)]
pub struct PipeNormalizer {
    alias: BTreeMap<String, Option<String>>,
    drop: HashSet<String>,
}

impl PipeNormalizer {
    /// Normalize a pipe-delimited value
    ///
    /// Tokens are normalized, aliased, filtered against the drop list and
    /// de-duplicated keeping the first occurrence. With `sort` the result is
    /// ordered lexicographically. Returns `None` when no token survives.
    pub fn apply(&self, value: &str, sort: bool) -> Option<String> {
        let mut seen = HashSet::new();
        let mut tokens: Vec<String> = Vec::new();

        for token in split_pipe_tokens(value) {
            let mapped = match self.alias.get(&token) {
                Some(Some(alias)) => alias.clone(),
                Some(None) => continue,
                None => token,
            };
            if self.drop.contains(&mapped) {
                continue;
            }
            if seen.insert(mapped.clone()) {
                tokens.push(mapped);
            }
        }

        if tokens.is_empty() {
            return None;
        }
        if sort {
            tokens.sort();
        }
        Some(tokens.join("|"))
    }
}

/// Normalize a pipe-delimited value with one-off rules
pub fn normalize_pipe(value: &str, rules: &PipeRules, sort: bool) -> Option<String> {
    rules.normalizer().apply(value, sort)
}

/// Collapse whitespace runs into a single space and trim
pub fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_space = false;

    for c in s.chars() {
        if c.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(c);
            prev_was_space = false;
        }
    }

    result.trim().to_string()
}

/// Unicode "other" characters (general category C)
fn is_other_char(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::PrivateUse
            | GeneralCategory::Surrogate
            | GeneralCategory::Unassigned
    )
}
