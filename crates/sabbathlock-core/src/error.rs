//! Core error types for sabbathlock-core.
//!
//! Scheduling and entitlement failures propagate to the caller; storage
//! failures are downgraded to warnings at the call site (last write wins,
//! next successful persist reconciles).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for sabbathlock-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Automatic mode requested without a premium entitlement.
    #[error("automatic Sabbath mode requires a premium subscription")]
    EntitlementRequired,

    /// The interval monitor rejected a schedule registration.
    #[error("failed to register the Sabbath schedule: {cause}")]
    SchedulingFailed { cause: String },

    /// A boundary callback arrived for a schedule name this app never registered.
    #[error("unknown schedule name '{name}'")]
    UnknownSchedule { name: String },

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Validation errors
    #[error("Invalid value for '{field}': {message}")]
    Validation { field: String, message: String },

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Should-be-unreachable conditions, surfaced rather than panicked.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the state store
    #[error("Failed to open state store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Could not resolve the data directory
    #[error("Failed to resolve data directory: {0}")]
    DataDir(String),

    /// Stored value could not be decoded
    #[error("Corrupt value for key '{key}': {message}")]
    CorruptValue { key: String, message: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::QueryFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
