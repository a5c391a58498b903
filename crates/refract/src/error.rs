//! Error types for the Refract library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Refract operations.
#[derive(Debug, Error)]
pub enum RefractError {
    /// Build options outside their documented bounds. Rejected before any I/O.
    #[error("Invalid build options: {0}")]
    Validation(String),

    /// Dataset id could not be resolved to a readable source.
    #[error("Dataset not found: '{dataset_id}'")]
    NotFound { dataset_id: String },

    /// Error reading or accessing a source file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The sampling/statistics stage could not produce any column profile.
    /// Aborts the build and leaves status `Error`; retryable on next request.
    #[error("Fatal build error for '{dataset_id}': {message}")]
    Fatal {
        dataset_id: String,
        message: String,
    },

    /// A call into the tabular query engine exceeded its timeout budget.
    #[error("Query timed out after {millis}ms: {operation}")]
    Timeout { operation: String, millis: u64 },

    /// The build was cancelled via its cancellation token.
    #[error("Build cancelled for '{dataset_id}'")]
    Cancelled { dataset_id: String },

    /// Error persisting or loading an index.
    #[error("Index store error: {0}")]
    Store(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Result type alias for Refract operations.
pub type Result<T> = std::result::Result<T, RefractError>;
