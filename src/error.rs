//! Error types for the CFI engine and locations index

use thiserror::Error;

pub use crate::cfi::{CfiParseError, ResolveError};

/// Failure to fetch a spine section from a [`crate::locations::SectionSource`]
#[derive(Debug, Error)]
pub enum SourceError {
    /// Section not found
    #[error("Section not found: {0}")]
    NotFound(String),

    /// Reading the section failed
    #[error("IO error reading {href}: {source}")]
    Io {
        href: String,
        #[source]
        source: std::io::Error,
    },
}

/// Locations index errors
#[derive(Debug, Error)]
pub enum LocationsError {
    /// A section could not be loaded during generation
    #[error("Failed to load section {index}: {source}")]
    Source {
        index: usize,
        #[source]
        source: SourceError,
    },

    /// Persisted index is not a JSON array of strings
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Invalid configuration value
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
