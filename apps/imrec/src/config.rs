//! Application configuration file

use imrec_core::DocumentConfig;
use imrec_io::IoConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("files.document_csv is not set")]
    MissingDocument,
}

/// Where input files live
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_path: PathBuf,
}

/// Input file names, relative to `source.base_path`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub document_csv: Option<PathBuf>,
    pub document_reference_csv: Option<PathBuf>,
}

/// Output location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputsConfig {
    pub dir: PathBuf,
    pub file_name: String,
}

impl Default for OutputsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            file_name: "document.csv".to_string(),
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub files: FilesConfig,
    pub io: IoConfig,
    pub outputs: OutputsConfig,
    pub document: DocumentConfig,
}

impl AppConfig {
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self, AppConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| AppConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| AppConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.source.base_path.join(file)
        }
    }

    pub fn document_path(&self) -> Result<PathBuf, AppConfigError> {
        self.files
            .document_csv
            .as_deref()
            .map(|file| self.resolve(file))
            .ok_or(AppConfigError::MissingDocument)
    }

    pub fn reference_path(&self) -> Option<PathBuf> {
        self.files
            .document_reference_csv
            .as_deref()
            .map(|file| self.resolve(file))
    }

    pub fn output_path(&self) -> PathBuf {
        self.outputs.dir.join(&self.outputs.file_name)
    }
}
