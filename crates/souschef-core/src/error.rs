//! Core error types for souschef-core.
//!
//! This module defines the error hierarchy using thiserror. Construction
//! preconditions surface as [`ValidationError`], persistence problems as
//! [`StorageError`]; both roll up into [`CoreError`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for souschef-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Entity construction precondition violations
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Precondition failures raised at entity construction.
///
/// These indicate programmer errors and are never silently coerced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A title field was empty
    #[error("Empty title for {entity}")]
    EmptyTitle { entity: &'static str },

    /// A step was constructed with an empty description
    #[error("Step description must not be empty")]
    EmptyDescription,

    /// A recipe was constructed with no steps
    #[error("Recipe '{title}' has no steps")]
    EmptySteps { title: String },

    /// Index out of bounds for a bunch operation
    #[error("Index {index} out of bounds for bunch '{bunch}' (length: {len})")]
    OutOfBounds {
        bunch: String,
        index: usize,
        len: usize,
    },
}

/// Storage-specific errors.
///
/// Propagated unchanged through the core; retry policy, if any, belongs
/// to the caller.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// A stored row could not be decoded
    #[error("Corrupt row in {table}: {message}")]
    CorruptRow { table: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
