//! Unified error hierarchy for recoverrs
//!
//! Scoring itself cannot fail; these errors come from the layers around it:
//! input validation, persistence, configuration and file export.

use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationError;

/// Top-level error type for all recoverrs operations
#[derive(Debug, Error)]
pub enum RecoverError {
    /// Input rejected before scoring
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON input/output errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Report export errors
    #[error("Export failed to {path}: {reason}")]
    Export { path: PathBuf, reason: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Database operation errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Underlying SQLite failure
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Database file or directory could not be created
    #[error("Database path error: {0}")]
    Path(#[from] std::io::Error),

    /// Stored payload could not be decoded
    #[error("Corrupt record {id}: {reason}")]
    CorruptRecord { id: String, reason: String },

    /// Record not found for this user
    #[error("Record not found: {table}.{id}")]
    NotFound { table: String, id: String },
}

/// Result type alias for recoverrs operations
pub type Result<T> = std::result::Result<T, RecoverError>;

impl RecoverError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            RecoverError::Database(DatabaseError::Sqlite(err)) => matches!(
                err.sqlite_error_code(),
                Some(rusqlite::ErrorCode::DatabaseBusy) | Some(rusqlite::ErrorCode::DatabaseLocked)
            ),
            RecoverError::Io(_) => true,
            _ => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RecoverError::Validation(_) => ErrorSeverity::Warning,
            RecoverError::Database(DatabaseError::NotFound { .. }) => ErrorSeverity::Warning,
            RecoverError::Database(DatabaseError::CorruptRecord { .. }) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            RecoverError::Validation(err) => {
                format!("Some workout values are out of range: {}", err)
            }
            RecoverError::Database(DatabaseError::NotFound { table, id }) => {
                format!("No {} entry with id {} for this user", table, id)
            }
            RecoverError::Database(DatabaseError::Sqlite(_)) => {
                "Unable to access the local database. Please check the configured path.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Data integrity problem requiring attention
    Critical,
    /// Error that prevents the operation
    Error,
    /// Rejected input or missing record
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical | ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldViolation;

    #[test]
    fn test_error_severity() {
        let err = RecoverError::Database(DatabaseError::NotFound {
            table: "todos".to_string(),
            id: "42".to_string(),
        });
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = RecoverError::Database(DatabaseError::CorruptRecord {
            id: "abc".to_string(),
            reason: "bad json".to_string(),
        });
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.severity().to_tracing_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_error_retryable() {
        let err = RecoverError::Io(std::io::Error::new(std::io::ErrorKind::Interrupted, "eintr"));
        assert!(err.is_retryable());

        let err = RecoverError::Configuration("bad".to_string());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_user_messages() {
        let err = RecoverError::Validation(ValidationError {
            violations: vec![FieldViolation {
                field: "sleep_hours".to_string(),
                message: "must be within 0-14, got 20".to_string(),
            }],
        });
        let message = err.user_message();
        assert!(message.contains("out of range"));
        assert!(message.contains("sleep_hours"));
    }
}
