//! Bounded connect-with-retry used once at startup.
//!
//! Requests never retry; only the initial connection does. Exhausting the
//! attempts is fatal for the process.

use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::{Result, StoreError};
use crate::sqlite::{SqliteLog, StoreConfig};

/// Fixed-delay retry schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }
}

/// Open the store, retrying on failure according to `policy`.
pub fn connect_with_retry(config: StoreConfig, policy: RetryPolicy) -> Result<SqliteLog> {
    retry(policy, |_| SqliteLog::open(config.clone()))
}

/// Run `op` up to `policy.attempts` times, sleeping `policy.delay` after each
/// failure except the last.
pub(crate) fn retry<T>(policy: RetryPolicy, mut op: impl FnMut(u32) -> Result<T>) -> Result<T> {
    let attempts = policy.attempts.max(1);
    let mut last_error = String::new();
    for attempt in 1..=attempts {
        match op(attempt) {
            Ok(value) => {
                if attempt > 1 {
                    info!(attempt, "prediction store connected after retry");
                }
                return Ok(value);
            }
            Err(e) => {
                warn!(attempt, max_attempts = attempts, error = %e, "failed to connect to prediction store");
                last_error = e.to_string();
                if attempt < attempts {
                    thread::sleep(policy.delay);
                }
            }
        }
    }
    Err(StoreError::Unreachable {
        attempts,
        last_error,
    })
}
