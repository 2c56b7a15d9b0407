//! Core error types for pomofocus-core.
//!
//! Every failure in the core degrades to "operation skipped, state
//! unchanged" and is surfaced once to the caller. Nothing here is fatal.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomofocus-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Import payload was rejected
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Session target adjustment was rejected
    #[error(transparent)]
    RejectedAdjustment(#[from] RejectedAdjustment),

    /// Persistence errors. The in-memory state is already updated when
    /// this is returned from a mutating operation.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Lookup by id failed
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

impl CoreError {
    pub fn project_not_found(id: &str) -> Self {
        CoreError::NotFound {
            kind: "project",
            id: id.to_string(),
        }
    }

    pub fn subtask_not_found(id: &str) -> Self {
        CoreError::NotFound {
            kind: "subtask",
            id: id.to_string(),
        }
    }
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is empty after trimming
    #[error("{0} name must not be empty")]
    EmptyName(&'static str),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Subtask counters violate `completedSessions <= totalSessions`
    #[error("Subtask {id}: completedSessions ({completed}) exceeds totalSessions ({total})")]
    CompletedExceedsTotal {
        id: String,
        completed: u32,
        total: u32,
    },
}

impl ValidationError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Import payload errors. No dataset mutation happens when one is returned.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Payload is not a dataset-shaped JSON document
    #[error("Invalid data format: {0}")]
    Format(String),

    /// Payload is well-formed but carries invariant-violating records
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::Format(err.to_string())
    }
}

/// Returned when a session target change would break
/// `totalSessions >= completedSessions` or `totalSessions >= 1`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Session target adjustment rejected: {total} {delta:+} would drop below max(completed={completed}, 1)")]
pub struct RejectedAdjustment {
    pub total: u32,
    pub completed: u32,
    pub delta: i64,
}

/// Storage-specific errors.
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
    Sqlite(#[from] rusqlite::Error),

    /// Stored payload could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Data directory could not be resolved
    #[error("Data directory unavailable: {0}")]
    DataDir(String),

    /// Store refused the write
    #[error("Save rejected: {0}")]
    Rejected(String),
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
