//! Error types for the prediction log.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors from prediction log operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not connect to prediction store after {attempts} attempts: {last_error}")]
    Unreachable { attempts: u32, last_error: String },

    #[error("connection lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    /// True when the fault is about reaching the database at all rather than
    /// a particular statement.
    pub fn is_connection_fault(&self) -> bool {
        match self {
            StoreError::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                rusqlite::ErrorCode::CannotOpen
                    | rusqlite::ErrorCode::NotADatabase
                    | rusqlite::ErrorCode::SystemIoFailure
                    | rusqlite::ErrorCode::DatabaseCorrupt
            ),
            StoreError::Io { .. } | StoreError::Unreachable { .. } => true,
            _ => false,
        }
    }
}
