//! Error types for the canonize library.
//!
//! Field-level conversion failures are never errors: they become
//! [`Value::Null`](crate::Value::Null) inside the cleaned table. The variants
//! here cover the file boundary and caller mistakes only.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for canonize operations.
#[derive(Debug, Error)]
pub enum CanonizeError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid delimiter detected or specified.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no columns to clean.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Entity name that does not match any known cleaner.
    #[error("Unknown entity '{0}'. Use: user, card, store, product, order, date_time")]
    UnknownEntity(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error writing a cleaned table.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Result type alias for canonize operations.
pub type Result<T> = std::result::Result<T, CanonizeError>;
