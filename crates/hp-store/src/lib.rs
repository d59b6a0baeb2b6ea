//! House price prediction log.
//!
//! This crate provides:
//! - The `predictions_log` table definition
//! - [`PredictionLog`], the append/query seam the service talks to
//! - [`SqliteLog`], the SQLite-backed implementation
//! - Bounded connect-with-retry for startup

pub mod error;
pub mod retry;
pub mod schema;
pub mod sqlite;

pub use error::{Result, StoreError};
pub use retry::{connect_with_retry, RetryPolicy};
pub use schema::TABLE_NAME;
pub use sqlite::{SqliteLog, StoreConfig};

use hp_common::{PredictionId, PredictionRecord, PredictionRequest};

/// Append-only store of served predictions.
///
/// Records are never updated or deleted. Ids are assigned by the store and
/// increase with insertion order.
pub trait PredictionLog: Send + Sync {
    /// Record one served prediction, returning its id.
    fn append(&self, request: &PredictionRequest, predicted_value: f64) -> Result<PredictionId>;

    /// Most recent records first, at most `limit`.
    fn list_recent(&self, limit: usize) -> Result<Vec<PredictionRecord>>;

    /// A single record, or `Ok(None)` when no record has this id.
    fn get(&self, id: PredictionId) -> Result<Option<PredictionRecord>>;
}
