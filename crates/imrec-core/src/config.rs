//! Configuration for the document pipeline
//!
//! Every section implements `Default`, so a partial TOML file is valid.

use imrec_identifiers::PipeRules;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Unknown column type {dtype:?} for column {column}")]
    UnknownType { column: String, dtype: String },

    #[error("Duplicate column in column_order: {0}")]
    DuplicateColumn(String),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Review vote parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Votes cast by a prior review flag, also counted as expected responses
    pub base_weight: u32,
    /// Normalized score above which a record is a review
    pub threshold: f64,
    /// Columns whose non-empty values count as additional responses
    pub response_columns: Vec<String>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            base_weight: 2,
            threshold: 0.335,
            response_columns: Vec::new(),
        }
    }
}

/// Pipe-list cleanup applied to one column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub column: String,
    #[serde(flatten)]
    pub rules: PipeRules,
}

/// Output column types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Text,
    Int,
    Float,
    Bool,
}

impl ColumnType {
    /// Parse a dtype name; several spellings are accepted
    pub fn parse(dtype: &str) -> Option<Self> {
        match dtype.trim().to_ascii_lowercase().as_str() {
            "string" | "str" | "text" | "object" => Some(ColumnType::Text),
            "int" | "int64" | "integer" => Some(ColumnType::Int),
            "float" | "float64" | "double" => Some(ColumnType::Float),
            "bool" | "boolean" | "logical" => Some(ColumnType::Bool),
            _ => None,
        }
    }
}

/// Document pipeline configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub review: ReviewConfig,
    pub classification_rules: Vec<ClassificationRule>,
    /// Final column renames
    pub rename_map: BTreeMap<String, String>,
    /// Column name to dtype name
    pub type_map: BTreeMap<String, String>,
    /// Output columns in order; empty sorts columns by name
    pub column_order: Vec<String>,
    /// Columns the input table must have
    pub required_columns: Vec<String>,
    /// Column name to zero-padded width
    pub zero_pad: BTreeMap<String, usize>,
    /// Emit per-source DOI diagnostics
    pub diagnostics: bool,
}

impl DocumentConfig {
    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parsed column types
    pub fn column_types(&self) -> Result<BTreeMap<String, ColumnType>, ConfigError> {
        self.type_map
            .iter()
            .map(|(column, dtype)| {
                ColumnType::parse(dtype)
                    .map(|t| (column.clone(), t))
                    .ok_or_else(|| ConfigError::UnknownType {
                        column: column.clone(),
                        dtype: dtype.clone(),
                    })
            })
            .collect()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.review.threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "review.threshold must be a non-negative number, got {}",
                threshold
            )));
        }

        let mut seen = BTreeSet::new();
        for column in &self.column_order {
            if !seen.insert(column.as_str()) {
                return Err(ConfigError::DuplicateColumn(column.clone()));
            }
        }

        if let Some(rule) = self.classification_rules.iter().find(|r| r.column.trim().is_empty()) {
            return Err(ConfigError::InvalidValue(format!(
                "classification rule without a column: {:?}",
                rule.rules
            )));
        }

        self.column_types()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DocumentConfig::default();
        assert_eq!(config.review.base_weight, 2);
        assert!((config.review.threshold - 0.335).abs() < f64::EPSILON);
        assert!(!config.diagnostics);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = DocumentConfig::from_toml(
            r#"
column_order = ["doi", "title"]

[review]
threshold = 0.5

[[classification_rules]]
column = "PubMed.publication_type"
drop = ["journal article"]

[classification_rules.alias]
"review article" = "review"
"#,
        )
        .unwrap();

        assert_eq!(config.review.base_weight, 2);
        assert_eq!(config.review.threshold, 0.5);
        assert_eq!(config.column_order, vec!["doi", "title"]);
        let rule = &config.classification_rules[0];
        assert_eq!(rule.column, "PubMed.publication_type");
        assert_eq!(rule.rules.drop, vec!["journal article"]);
        assert_eq!(rule.rules.alias.get("review article").map(String::as_str), Some("review"));
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = DocumentConfig::default();
        config.zero_pad.insert("PMID".to_string(), 8);
        config.type_map.insert("volume".to_string(), "int64".to_string());
        let json = config.to_json().unwrap();
        assert_eq!(DocumentConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = DocumentConfig::default();
        config.review.threshold = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));

        let mut config = DocumentConfig::default();
        config.column_order = vec!["a".to_string(), "a".to_string()];
        assert!(matches!(config.validate(), Err(ConfigError::DuplicateColumn(_))));

        let mut config = DocumentConfig::default();
        config.type_map.insert("a".to_string(), "complex".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::UnknownType { .. })));
    }

    #[test]
    fn test_column_type_aliases() {
        assert_eq!(ColumnType::parse("Int64"), Some(ColumnType::Int));
        assert_eq!(ColumnType::parse("boolean"), Some(ColumnType::Bool));
        assert_eq!(ColumnType::parse("double"), Some(ColumnType::Float));
        assert_eq!(ColumnType::parse("string"), Some(ColumnType::Text));
        assert_eq!(ColumnType::parse("date"), None);
    }
}
