//! Request and prediction identity types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Row identifier assigned by the prediction log.
///
/// Monotonic: a newer record always has a larger id than any older one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionId(pub i64);

impl fmt::Display for PredictionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PredictionId {
    fn from(id: i64) -> Self {
        PredictionId(id)
    }
}

impl FromStr for PredictionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(PredictionId)
    }
}

/// Correlation ID attached to every HTTP request's tracing span.
///
/// Format: `req-<random>`
/// Example: `req-3f9a1c`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a new request ID.
    pub fn new() -> Self {
        let random: String = uuid::Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(6)
            .collect();
        RequestId(format!("req-{}", random))
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
