use std::path::Path;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Everything that aborts a catalog run.
///
/// Conditions that only shrink the catalog (missing programme folder, PDF
/// without a year, unmatched code) are not errors and never show up here.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("{operation} '{path}': {source}")]
    Io {
        operation: &'static str,
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed map file '{path}': {source}")]
    MalformedMap {
        path: String,
        source: serde_json::Error,
    },

    #[error("Invalid config '{path}': {source}")]
    Config {
        path: String,
        source: toml::de::Error,
    },

    #[error("Config file not found: {0}")]
    MissingConfig(String),

    #[error("Invalid year pattern: {0}")]
    YearPattern(#[from] regex::Error),

    #[error("Maps directory not found: {0}")]
    MissingMapsDir(String),

    #[error("Papers directory not found: {0}")]
    MissingPapersDir(String),

    #[error("Failed to serialize catalog: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CatalogError {
    pub fn io(operation: &'static str, path: &Path, source: std::io::Error) -> Self {
        CatalogError::Io {
            operation,
            path: path.display().to_string(),
            source,
        }
    }
}
