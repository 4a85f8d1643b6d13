//! Core error types for focusquest-core.
//!
//! This module defines the error hierarchy using thiserror. Lifecycle
//! errors are kept separate from storage and configuration errors so the
//! CLI (or any other caller) can map them to distinct responses.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focusquest-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Session lifecycle errors
    #[error(transparent)]
    Session(#[from] SessionError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
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

/// Validation errors. Rejected before any state mutation takes place.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Interval duration outside the accepted policy range
    #[error("Duration must be between {min} and {max} minutes, got {got}")]
    DurationOutOfRange { min: u32, max: u32, got: u32 },

    /// Task estimate outside the accepted policy range
    #[error("Estimated intervals must be between {min} and {max}, got {got}")]
    EstimateOutOfRange { min: u32, max: u32, got: u32 },

    /// Session kind string outside the closed set
    #[error("Unknown session kind: {0}")]
    UnknownKind(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Errors raised by the session lifecycle manager.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Session missing, or owned by another account. Ownership failures
    /// report as not-found so callers cannot probe for foreign sessions.
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Completion requested on a session already marked completed. The
    /// session exists, so this is surfaced distinctly from not-found.
    #[error("Session already completed: {0}")]
    AlreadyCompleted(String),

    /// Owning account missing. Should not occur under referential
    /// integrity but is handled rather than assumed away.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Task missing, or owned by another account, at interval start.
    #[error("Task not found: {0}")]
    TaskNotFound(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
