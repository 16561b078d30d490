//! Core error types for eisenhower-core.
//!
//! The classification, ordering and layout engines never fail; these errors
//! come from the persistence collaborator, configuration handling and input
//! parsing at the edges.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for eisenhower-core.
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

    /// Entity lookup failed
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    pub fn task_not_found(id: impl Into<String>) -> Self {
        CoreError::NotFound {
            kind: "Task",
            id: id.into(),
        }
    }

    pub fn event_not_found(id: impl Into<String>) -> Self {
        CoreError::NotFound {
            kind: "Event",
            id: id.into(),
        }
    }
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

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// No home or config directory could be resolved
    #[error("Could not determine data directory")]
    NoDataDir,
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Duration below the timeline minimum
    #[error("Duration of {secs}s is below the minimum of {min_secs}s")]
    DurationTooShort { secs: i64, min_secs: i64 },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_names_kind() {
        let err = CoreError::task_not_found("abc");
        assert_eq!(err.to_string(), "Task not found: abc");
        let err = CoreError::event_not_found("e1");
        assert_eq!(err.to_string(), "Event not found: e1");
    }

    #[test]
    fn wrapped_errors_keep_their_source_message() {
        let err: CoreError = ValidationError::DurationTooShort {
            secs: 600,
            min_secs: 900,
        }
        .into();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(err.to_string().starts_with("Validation error: "));

        let err: CoreError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.to_string(), "IO error: gone");
    }

    #[test]
    fn rusqlite_errors_convert_to_query_failed() {
        let err: DatabaseError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, DatabaseError::QueryFailed(_)));
    }
}
