//! House price service common types, IDs, and errors.
//!
//! This crate provides foundational types shared across the hp-* crates:
//! - The prediction request and persisted record shapes
//! - Request and prediction identifiers
//! - Common error types
//! - Output format selection

pub mod error;
pub mod id;
pub mod output;
pub mod schema;
pub mod types;

pub use error::{Error, Result};
pub use id::{PredictionId, RequestId};
pub use output::OutputFormat;
pub use schema::SCHEMA_VERSION;
pub use types::{
    ErrorDetail, OceanProximity, PredictionRecord, PredictionRequest, PredictionResponse,
    WelcomeMessage, CATEGORICAL_FIELD, NUMERIC_FIELDS,
};
