//! Multi-source DOI consensus
//!
//! Every provider's DOI is normalized, identical normalized values are
//! grouped and counted, and one value is selected:
//!
//! 1. The primary provider's own valid DOI, regardless of its peers
//! 2. Otherwise the consensus value when at least two providers agree
//! 3. Otherwise the valid DOI of the most trusted provider that has one
//! 4. Otherwise nothing
//!
//! The consensus value is the one with the most support; ties go to the
//! value whose most trusted supporter has the lowest priority. Providers
//! are visited in trust order.

use crate::sources::{Source, FALLBACK_PRIORITY, PRIMARY_SOURCE, SOURCE_COUNT};
use imrec_identifiers::normalize_doi;
use imrec_io::RawRecord;
use serde::{Deserialize, Serialize};

/// Minimum number of agreeing providers for peer consensus to be selected
pub const CONSENSUS_MIN_SUPPORT: usize = 2;

/// One provider's DOI before and after normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedIdentifier {
    pub source: Source,
    /// Cleaned raw text as delivered by the provider
    pub raw: String,
    /// Canonical DOI, `None` when missing or malformed
    pub normalized: Option<String>,
}

impl NormalizedIdentifier {
    /// Normalize a provider's raw value
    pub fn new(source: Source, raw: &str) -> Self {
        Self {
            source,
            raw: imrec_identifiers::clean_text(raw),
            normalized: normalize_doi(raw),
        }
    }

    pub fn source_key(&self) -> &'static str {
        self.source.key()
    }

    /// Valid exactly when a normalized value exists
    pub fn valid(&self) -> bool {
        self.normalized.is_some()
    }
}

/// Outcome of consensus selection for one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// The DOI chosen for the record
    pub selected_value: Option<String>,
    /// The provider credited with the chosen DOI
    pub selected_source: Option<Source>,
    /// The highest-support normalized value
    pub consensus_value: Option<String>,
    /// Most trusted provider supporting the consensus value
    pub consensus_source: Option<Source>,
    /// Number of providers supporting the consensus value
    pub support_count: usize,
    /// Best priority among the consensus value's supporters
    pub tie_break_priority: u8,
}

/// Per-record identifiers plus the consensus computed from them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Normalized identifiers indexed by provider rank
    pub identifiers: [NormalizedIdentifier; SOURCE_COUNT],
    pub consensus: ConsensusResult,
}

impl Resolution {
    /// The primary provider's identifier
    pub fn primary(&self) -> &NormalizedIdentifier {
        &self.identifiers[PRIMARY_SOURCE.rank()]
    }

    /// Identifier of one provider
    pub fn identifier(&self, source: Source) -> &NormalizedIdentifier {
        &self.identifiers[source.rank()]
    }

    /// Normalized values of valid non-primary providers, in trust order
    pub fn peer_values(&self) -> Vec<&str> {
        self.identifiers
            .iter()
            .filter(|id| !id.source.is_primary())
            .filter_map(|id| id.normalized.as_deref())
            .collect()
    }

    /// At least one non-primary provider has a valid DOI
    pub fn has_peer_support(&self) -> bool {
        !self.peer_values().is_empty()
    }

    /// Number of peers whose DOI equals the primary's
    pub fn primary_confirmations(&self) -> usize {
        match self.primary().normalized.as_deref() {
            Some(primary) => self
                .peer_values()
                .iter()
                .filter(|value| **value == primary)
                .count(),
            None => 0,
        }
    }

    /// Number of distinct valid DOIs across all providers
    pub fn distinct_valid_count(&self) -> usize {
        tally(&self.identifiers).len()
    }
}

/// Support tally for one distinct normalized value
#[derive(Debug, Clone, PartialEq, Eq)]
struct Candidate<'a> {
    value: &'a str,
    support: usize,
    best: Source,
}

/// Group valid identifiers by value in trust order of first appearance
fn tally(identifiers: &[NormalizedIdentifier; SOURCE_COUNT]) -> Vec<Candidate<'_>> {
    let mut candidates: Vec<Candidate<'_>> = Vec::with_capacity(SOURCE_COUNT);
    for id in identifiers {
        let Some(value) = id.normalized.as_deref() else {
            continue;
        };
        match candidates.iter_mut().find(|c| c.value == value) {
            Some(candidate) => {
                candidate.support += 1;
                if id.source.priority() < candidate.best.priority() {
                    candidate.best = id.source;
                }
            }
            None => candidates.push(Candidate {
                value,
                support: 1,
                best: id.source,
            }),
        }
    }
    candidates
}

/// Pick the highest-support candidate, ties to the lower best priority
fn pick_consensus<'b, 'a>(candidates: &'b [Candidate<'a>]) -> Option<&'b Candidate<'a>> {
    let mut best: Option<&'b Candidate<'a>> = None;
    for candidate in candidates {
        best = match best {
            None => Some(candidate),
            Some(current)
                if candidate.support > current.support
                    || (candidate.support == current.support
                        && candidate.best.priority() < current.best.priority()) =>
            {
                Some(candidate)
            }
            keep => keep,
        };
    }
    best
}

/// Read and normalize every provider's DOI from a record
pub fn normalize_sources(record: &RawRecord<'_>) -> [NormalizedIdentifier; SOURCE_COUNT] {
    Source::ALL.map(|source| NormalizedIdentifier::new(source, &record.text(source.doi_column())))
}

/// Run consensus selection over already normalized identifiers
pub fn resolve_identifiers(identifiers: [NormalizedIdentifier; SOURCE_COUNT]) -> Resolution {
    let candidates = tally(&identifiers);
    let consensus = pick_consensus(&candidates);

    let consensus_value = consensus.map(|c| c.value.to_string());
    let consensus_source = consensus.map(|c| c.best);
    let support_count = consensus.map_or(0, |c| c.support);
    let tie_break_priority = consensus.map_or(FALLBACK_PRIORITY, |c| c.best.priority());

    let primary = &identifiers[PRIMARY_SOURCE.rank()];
    let most_trusted_valid = identifiers.iter().find(|id| id.valid());

    let (selected_value, selected_source) = if let Some(value) = &primary.normalized {
        (Some(value.clone()), Some(PRIMARY_SOURCE))
    } else if support_count >= CONSENSUS_MIN_SUPPORT {
        (consensus_value.clone(), consensus_source)
    } else if let Some(id) = most_trusted_valid {
        (id.normalized.clone(), Some(id.source))
    } else {
        (None, None)
    };

    Resolution {
        identifiers,
        consensus: ConsensusResult {
            selected_value,
            selected_source,
            consensus_value,
            consensus_source,
            support_count,
            tie_break_priority,
        },
    }
}

/// Normalize and resolve the DOIs of one record
pub fn resolve_record(record: &RawRecord<'_>) -> Resolution {
    resolve_identifiers(normalize_sources(record))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: [&str; SOURCE_COUNT]) -> [NormalizedIdentifier; SOURCE_COUNT] {
        let mut i = 0;
        Source::ALL.map(|source| {
            let id = NormalizedIdentifier::new(source, values[i]);
            i += 1;
            id
        })
    }

    #[test]
    fn test_identifier_validity_follows_normalization() {
        let id = NormalizedIdentifier::new(Source::Crossref, " DOI:10.1000/ABC ");
        assert!(id.valid());
        assert_eq!(id.source_key(), "crossref");
        assert_eq!(id.raw, "DOI:10.1000/ABC");
        assert_eq!(id.normalized.as_deref(), Some("10.1000/abc"));

        let bad = NormalizedIdentifier::new(Source::Crossref, "n/a");
        assert!(!bad.valid());
    }

    #[test]
    fn test_no_valid_identifiers() {
        let resolution = resolve_identifiers(ids(["", "junk", "", "", ""]));
        assert_eq!(resolution.consensus.selected_value, None);
        assert_eq!(resolution.consensus.selected_source, None);
        assert_eq!(resolution.consensus.consensus_value, None);
        assert_eq!(resolution.consensus.support_count, 0);
        assert_eq!(resolution.consensus.tie_break_priority, FALLBACK_PRIORITY);
    }

    #[test]
    fn test_tally_groups_in_trust_order() {
        let identifiers = ids(["", "10.1/b", "10.1/a", "10.1/b", "10.1/a"]);
        let candidates = tally(&identifiers);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].value, "10.1/b");
        assert_eq!(candidates[0].best, Source::Crossref);
        assert_eq!(candidates[1].best, Source::OpenAlex);
    }

    #[test]
    fn test_support_tie_prefers_trusted() {
        let resolution = resolve_identifiers(ids(["", "10.1/b", "10.1/a", "10.1/b", "10.1/a"]));
        assert_eq!(resolution.consensus.consensus_value.as_deref(), Some("10.1/b"));
        assert_eq!(resolution.consensus.support_count, 2);
        assert_eq!(resolution.consensus.tie_break_priority, 1);
        assert_eq!(resolution.distinct_valid_count(), 2);
    }

    #[test]
    fn test_primary_confirmations() {
        let resolution = resolve_identifiers(ids([
            "10.1/a", "10.1/a", "10.1/b", "10.1/a", "",
        ]));
        assert_eq!(resolution.primary_confirmations(), 2);
        assert_eq!(resolution.peer_values(), vec!["10.1/a", "10.1/b", "10.1/a"]);
        assert!(resolution.has_peer_support());
    }
}
