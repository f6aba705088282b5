//! Bibliographic data providers and their trust ranking
//!
//! The set of providers is closed: adding one is a code change that
//! extends [`Source`] and [`SOURCE_CATALOG`] together.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of providers
pub const SOURCE_COUNT: usize = 5;

/// Providers that supply candidate values for a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Source {
    /// PubMed, the curated primary registry
    PubMed,
    /// Crossref
    Crossref,
    /// OpenAlex
    OpenAlex,
    /// ChEMBL document records
    Chembl,
    /// Semantic Scholar
    Scholar,
}

/// Static description of one provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpec {
    pub source: Source,
    /// Short key used in diagnostic column names
    pub key: &'static str,
    /// Name reported in `selected_source`
    pub display_name: &'static str,
    /// Trust rank, 0 is most trusted
    pub priority: u8,
    /// Column holding this provider's DOI
    pub column: &'static str,
}

/// Providers ordered by trust; index equals priority
pub const SOURCE_CATALOG: [SourceSpec; SOURCE_COUNT] = [
    SourceSpec {
        source: Source::PubMed,
        key: "pm",
        display_name: "PubMed",
        priority: 0,
        column: "PubMed.doi",
    },
    SourceSpec {
        source: Source::Crossref,
        key: "crossref",
        display_name: "crossref",
        priority: 1,
        column: "crossref.doi",
    },
    SourceSpec {
        source: Source::OpenAlex,
        key: "openalex",
        display_name: "OpenAlex",
        priority: 2,
        column: "OpenAlex.doi",
    },
    SourceSpec {
        source: Source::Chembl,
        key: "chembl",
        display_name: "ChEMBL",
        priority: 3,
        column: "ChEMBL.doi",
    },
    SourceSpec {
        source: Source::Scholar,
        key: "scholar",
        display_name: "scholar",
        priority: 4,
        column: "scholar.doi",
    },
];

/// Priority assigned when no provider supports a value
pub const FALLBACK_PRIORITY: u8 = SOURCE_COUNT as u8;

/// The primary provider whose own valid value wins
pub const PRIMARY_SOURCE: Source = Source::PubMed;

impl Source {
    /// All providers in trust order
    pub const ALL: [Source; SOURCE_COUNT] = [
        Source::PubMed,
        Source::Crossref,
        Source::OpenAlex,
        Source::Chembl,
        Source::Scholar,
    ];

    /// Position in [`SOURCE_CATALOG`]
    pub fn rank(self) -> usize {
        match self {
            Source::PubMed => 0,
            Source::Crossref => 1,
            Source::OpenAlex => 2,
            Source::Chembl => 3,
            Source::Scholar => 4,
        }
    }

    pub fn spec(self) -> &'static SourceSpec {
        &SOURCE_CATALOG[self.rank()]
    }

    pub fn key(self) -> &'static str {
        self.spec().key
    }

    pub fn display_name(self) -> &'static str {
        self.spec().display_name
    }

    pub fn priority(self) -> u8 {
        self.spec().priority
    }

    pub fn doi_column(self) -> &'static str {
        self.spec().column
    }

    pub fn is_primary(self) -> bool {
        self == PRIMARY_SOURCE
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
