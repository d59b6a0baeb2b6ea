//! Typed server configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_MODEL_PATH: &str = "models/house_price_model.json";
pub const DEFAULT_COLUMNS_PATH: &str = "models/model_columns.json";
pub const DEFAULT_DATABASE_PATH: &str = "data/predictions.db";
pub const DEFAULT_HISTORY_LIMIT: usize = 10;
pub const DEFAULT_CONNECT_ATTEMPTS: u32 = 3;
pub const DEFAULT_CONNECT_RETRY_DELAY_SECS: u64 = 5;
pub const DEFAULT_WORKERS: usize = 4;

/// Everything the service needs to start.
///
/// Every field has a default, so a config file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// `host:port` the HTTP server listens on.
    pub bind_addr: String,

    /// Serialized fitted model.
    pub model_path: PathBuf,

    /// Serialized training-time column list.
    pub columns_path: PathBuf,

    /// SQLite file holding the prediction log.
    pub database_path: PathBuf,

    /// Maximum records returned by `GET /history`.
    pub history_limit: usize,

    /// Startup connection attempts before giving up.
    pub connect_attempts: u32,

    /// Fixed pause between startup connection attempts.
    pub connect_retry_delay_secs: u64,

    /// HTTP worker threads.
    pub workers: usize,
}

impl ServerConfig {
    pub fn connect_retry_delay(&self) -> Duration {
        Duration::from_secs(self.connect_retry_delay_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            columns_path: PathBuf::from(DEFAULT_COLUMNS_PATH),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            history_limit: DEFAULT_HISTORY_LIMIT,
            connect_attempts: DEFAULT_CONNECT_ATTEMPTS,
            connect_retry_delay_secs: DEFAULT_CONNECT_RETRY_DELAY_SECS,
            workers: DEFAULT_WORKERS,
        }
    }
}
