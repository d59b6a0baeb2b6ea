//! Error types for the house price service.

use thiserror::Error;

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the house price service.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    // Artifact errors (20-29)
    #[error("model artifact error: {0}")]
    Artifact(String),

    // Prediction errors (30-39)
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("normalization failed: {0}")]
    Normalization(String),

    #[error("scoring failed: {0}")]
    Scoring(String),

    // Store errors (40-49)
    #[error("prediction store error: {0}")]
    Store(String),

    #[error("prediction store connection error: {0}")]
    StoreConnection(String),

    #[error("prediction store unreachable after {attempts} attempts: {reason}")]
    StoreUnreachable { attempts: u32, reason: String },

    #[error("prediction {id} not found")]
    PredictionNotFound { id: i64 },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Server errors (70-79)
    #[error("HTTP server error: {0}")]
    Server(String),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting in JSON output.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::Artifact(_) => 20,
            Error::Validation(_) => 30,
            Error::Normalization(_) => 31,
            Error::Scoring(_) => 32,
            Error::Store(_) => 40,
            Error::StoreConnection(_) => 41,
            Error::StoreUnreachable { .. } => 42,
            Error::PredictionNotFound { .. } => 43,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
            Error::Server(_) => 70,
        }
    }

    /// Faults in the prediction store, as opposed to the request or model.
    pub fn is_store_fault(&self) -> bool {
        matches!(
            self,
            Error::Store(_) | Error::StoreConnection(_) | Error::StoreUnreachable { .. }
        )
    }
}
