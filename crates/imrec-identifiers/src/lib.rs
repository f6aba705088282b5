//! Text and identifier normalization for bibliographic reconciliation
//!
//! This crate provides the pure string functions the reconciliation engine
//! builds on:
//! - Text cleanup (control characters, whitespace, case folding)
//! - Pipe-delimited list tokenization with aliasing and de-duplication
//! - DOI normalization and rejection of malformed values
//! - PubMed identifier sanitizing

pub mod doi;
pub mod pmid;
pub mod text;

pub use doi::*;
pub use pmid::*;
pub use text::*;
