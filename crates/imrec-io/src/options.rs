//! CSV dialect and encoding options

use crate::reader::{IoError, IoResult};
use serde::{Deserialize, Serialize};

/// Quoting style for reading and writing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quoting {
    /// Quote only fields that need it
    #[default]
    Minimal,
    /// Quote every field
    All,
    /// Quote every non-numeric field
    NonNumeric,
    /// Never quote; quotes are literal characters on read
    None,
}

/// I/O settings for reading sources and writing the result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Field delimiter (single ASCII character)
    pub delimiter: char,
    /// Quoting style
    pub quoting: Quoting,
    /// Preferred input encoding label
    pub encoding_in: String,
    /// Encodings tried in order when the preferred one fails
    pub encoding_fallbacks: Vec<String>,
    /// Output encoding label (defaults to `encoding_in`)
    pub encoding_out: Option<String>,
    /// Raw field values read as null
    pub na_values: Vec<String>,
    /// Line terminator for written files ("\n" or "\r\n")
    pub line_terminator: String,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quoting: Quoting::Minimal,
            encoding_in: "utf-8".to_string(),
            encoding_fallbacks: vec!["windows-1252".to_string(), "iso-8859-1".to_string()],
            encoding_out: None,
            na_values: vec![
                String::new(),
                "NA".to_string(),
                "null".to_string(),
                "None".to_string(),
            ],
            line_terminator: "\n".to_string(),
        }
    }
}

impl IoConfig {
    /// Delimiter as a byte, rejecting non-ASCII delimiters
    pub fn delimiter_byte(&self) -> IoResult<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(IoError::InvalidOption {
                name: "delimiter".to_string(),
                reason: format!("{:?} is not an ASCII character", self.delimiter),
            })
        }
    }

    /// Input encodings in the order they are tried, without duplicates
    pub fn encoding_candidates(&self) -> Vec<String> {
        let mut candidates: Vec<String> = Vec::new();
        let all = std::iter::once(&self.encoding_in).chain(self.encoding_fallbacks.iter());
        for label in all {
            let label = label.trim();
            if label.is_empty() || candidates.iter().any(|c| c.eq_ignore_ascii_case(label)) {
                continue;
            }
            candidates.push(label.to_string());
        }
        candidates
    }

    /// Output encoding label
    pub fn output_encoding(&self) -> &str {
        self.encoding_out.as_deref().unwrap_or(&self.encoding_in)
    }

    /// Check whether a raw field is one of the configured null markers
    pub fn is_na(&self, raw: &str) -> bool {
        self.na_values.iter().any(|na| na == raw)
    }
}
