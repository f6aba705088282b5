//! Error types for imrec-core

use crate::config::ConfigError;
use imrec_io::IoError;
use thiserror::Error;

/// Result type alias for reconciliation operations
pub type Result<T> = std::result::Result<T, ReconError>;

/// Main error type for reconciliation
///
/// Malformed values inside a record are never errors; they are reported
/// through validity flags on the record itself.
#[derive(Error, Debug)]
pub enum ReconError {
    /// Columns declared mandatory are absent from an input table
    #[error("{context} is missing required columns: {}", .columns.join(", "))]
    MissingColumns {
        context: String,
        columns: Vec<String>,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Table error: {0}")]
    Io(#[from] IoError),
}
