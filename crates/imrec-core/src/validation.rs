//! Validity flags derived from consensus and numeric parsing

use crate::coalesce::CoalescedFields;
use crate::consensus::Resolution;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Records with at most this much consensus support are flagged invalid
pub const MIN_TRUSTED_SUPPORT: usize = 2;

/// Why a record's DOI was accepted or flagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoiReason {
    /// The primary DOI is absent or malformed while a peer has one
    PubmedDoiMissingOrMalformed,
    /// The primary DOI disagrees with every valid peer
    PubmedDoiMismatchWithSources,
    /// At least one peer agrees with the primary DOI
    PubmedDoiConfirmed,
    /// Not enough data to judge
    InsufficientData,
}

impl DoiReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DoiReason::PubmedDoiMissingOrMalformed => "pubmed_doi_missing_or_malformed",
            DoiReason::PubmedDoiMismatchWithSources => "pubmed_doi_mismatch_with_sources",
            DoiReason::PubmedDoiConfirmed => "pubmed_doi_confirmed",
            DoiReason::InsufficientData => "insufficient_data",
        }
    }

    /// Whether this reason marks the DOI as invalid
    pub fn is_invalid(self) -> bool {
        matches!(
            self,
            DoiReason::PubmedDoiMissingOrMalformed | DoiReason::PubmedDoiMismatchWithSources
        )
    }
}

impl fmt::Display for DoiReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-record validity flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFlags {
    pub invalid_doi: bool,
    pub reason: DoiReason,
    pub invalid_volume: bool,
    pub invalid_issue: bool,
    pub invalid_record: bool,
}

/// Classify the primary DOI against its peers; first matching rule wins
pub fn annotate_doi(resolution: &Resolution) -> DoiReason {
    let primary = resolution.primary();
    let has_peer_support = resolution.has_peer_support();
    let confirmed = resolution.primary_confirmations() > 0;

    if !primary.valid() && has_peer_support {
        DoiReason::PubmedDoiMissingOrMalformed
    } else if primary.valid() && has_peer_support && !confirmed {
        DoiReason::PubmedDoiMismatchWithSources
    } else if primary.valid() && confirmed {
        DoiReason::PubmedDoiConfirmed
    } else {
        DoiReason::InsufficientData
    }
}

/// Low support or an unparseable volume or issue invalidates a record
pub fn is_invalid_record(support_count: usize, invalid_volume: bool, invalid_issue: bool) -> bool {
    support_count <= MIN_TRUSTED_SUPPORT || invalid_volume || invalid_issue
}

/// Compute every validation flag of a record
pub fn annotate(resolution: &Resolution, fields: &CoalescedFields) -> ValidationFlags {
    let reason = annotate_doi(resolution);
    let invalid_volume = fields.volume.invalid;
    let invalid_issue = fields.issue.invalid;

    ValidationFlags {
        invalid_doi: reason.is_invalid(),
        reason,
        invalid_volume,
        invalid_issue,
        invalid_record: is_invalid_record(
            resolution.consensus.support_count,
            invalid_volume,
            invalid_issue,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coalesce::ParsedInt;
    use crate::consensus::{resolve_identifiers, NormalizedIdentifier};
    use crate::sources::Source;

    fn resolve(values: [&str; 5]) -> Resolution {
        let mut values = values.into_iter();
        resolve_identifiers(
            Source::ALL.map(|source| NormalizedIdentifier::new(source, values.next().unwrap_or(""))),
        )
    }

    #[test]
    fn test_reason_strings() {
        assert_eq!(
            DoiReason::PubmedDoiMissingOrMalformed.to_string(),
            "pubmed_doi_missing_or_malformed"
        );
        assert_eq!(
            serde_json::to_string(&DoiReason::InsufficientData).unwrap(),
            "\"insufficient_data\""
        );
    }

    #[test]
    fn test_missing_primary_with_peer() {
        let reason = annotate_doi(&resolve(["", "10.1/a", "", "", ""]));
        assert_eq!(reason, DoiReason::PubmedDoiMissingOrMalformed);
        assert!(reason.is_invalid());
    }

    #[test]
    fn test_mismatch() {
        let reason = annotate_doi(&resolve(["10.1/a", "10.1/b", "", "", ""]));
        assert_eq!(reason, DoiReason::PubmedDoiMismatchWithSources);
    }

    #[test]
    fn test_confirmed_by_one_of_several() {
        let reason = annotate_doi(&resolve(["10.1/a", "10.1/b", "10.1/a", "", ""]));
        assert_eq!(reason, DoiReason::PubmedDoiConfirmed);
        assert!(!reason.is_invalid());
    }

    #[test]
    fn test_insufficient_data() {
        assert_eq!(annotate_doi(&resolve(["10.1/a", "", "", "", ""])), DoiReason::InsufficientData);
        assert_eq!(annotate_doi(&resolve(["", "", "", "", ""])), DoiReason::InsufficientData);
    }

    #[test]
    fn test_invalid_record() {
        assert!(is_invalid_record(2, false, false));
        assert!(!is_invalid_record(3, false, false));
        assert!(is_invalid_record(5, true, false));
        assert!(is_invalid_record(5, false, true));
    }

    #[test]
    fn test_annotate_combines_flags() {
        let resolution = resolve(["10.1/a", "10.1/a", "10.1/a", "10.1/a", ""]);
        let mut fields = CoalescedFields::default();
        let flags = annotate(&resolution, &fields);
        assert!(!flags.invalid_doi);
        assert!(!flags.invalid_record);

        fields.issue = ParsedInt {
            value: None,
            invalid: true,
        };
        let flags = annotate(&resolution, &fields);
        assert!(flags.invalid_issue);
        assert!(flags.invalid_record);
    }
}
