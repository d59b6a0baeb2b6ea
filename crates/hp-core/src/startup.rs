//! Startup wiring: artifacts, store connection, service.
//!
//! Any failure here is fatal; the process never serves with a partial
//! context.

use std::sync::Arc;

use hp_common::Result;
use hp_config::ServerConfig;
use hp_store::{connect_with_retry, RetryPolicy, SqliteLog, StoreConfig};
use tracing::info;

use crate::context::ServingContext;
use crate::errors;
use crate::service::PredictionService;

/// Open the prediction log with the configured bounded retry.
pub fn connect_store(config: &ServerConfig) -> Result<SqliteLog> {
    let policy = RetryPolicy::new(config.connect_attempts, config.connect_retry_delay());
    connect_with_retry(StoreConfig::file(&config.database_path), policy).map_err(errors::store)
}

/// Build the full service: artifacts first, then the store.
pub fn build_service(config: &ServerConfig) -> Result<PredictionService> {
    let context = ServingContext::load(config)?;
    let log = connect_store(config)?;
    info!(
        bind_addr = %config.bind_addr,
        history_limit = config.history_limit,
        "service ready"
    );
    Ok(PredictionService::new(
        Arc::new(context),
        Arc::new(log),
        config.history_limit,
    ))
}
