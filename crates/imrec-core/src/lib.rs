//! imrec-core - Multi-source bibliographic record reconciliation
//!
//! Document records are collected independently from PubMed, Crossref,
//! OpenAlex, ChEMBL and Semantic Scholar. This crate decides which DOI is
//! canonical, flags records whose identifiers or numbers look wrong, fills
//! descriptive fields from the first provider that has them and classifies
//! review articles by weighted vote.
//!
//! # Modules
//!
//! - [`sources`]: the closed set of providers and their trust ranking
//! - [`consensus`]: DOI normalization per provider and consensus selection
//! - [`coalesce`]: first-non-empty field selection and integer parsing
//! - [`validation`]: `invalid_doi`, `reason` and `invalid_record` flags
//! - [`review`]: the weighted review vote
//! - [`pipeline`]: the end-to-end document pipeline
//!
//! # Determinism
//!
//! Providers are always visited in trust order and every per-record result
//! depends only on that record, so running the pipeline twice on the same
//! input gives identical output.

pub mod classification;
pub mod coalesce;
pub mod config;
pub mod consensus;
pub mod dates;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prepare;
pub mod reference;
pub mod review;
pub mod sources;
pub mod validation;

pub use classification::apply_classification_rules;
pub use coalesce::{coalesce_fields, coalesce_text, normalize_page, CoalescedFields, ParsedInt};
pub use config::{ClassificationRule, ColumnType, ConfigError, DocumentConfig, ReviewConfig};
pub use consensus::{
    normalize_sources, resolve_identifiers, resolve_record, ConsensusResult, NormalizedIdentifier,
    Resolution,
};
pub use error::{ReconError, Result};
pub use output::OutputAssembler;
pub use pipeline::{reconcile_record, run_document_pipeline, DocumentInputs, RecordOutcome};
pub use review::{classify_review, ReviewVote};
pub use sources::{Source, SourceSpec, SOURCE_CATALOG};
pub use validation::{annotate, annotate_doi, DoiReason, ValidationFlags};

// Re-export the lower layers so callers need a single dependency
pub use imrec_identifiers;
pub use imrec_io;
