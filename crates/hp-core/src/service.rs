//! Serving and history operations.
//!
//! A prediction moves through
//! `received → normalized → scored → (logged | log-failed) → responded`.
//! Only normalization or scoring can end it in an error; the outcome of the
//! log append is reported as a [`LogOutcome`] and never changes the result.

use std::sync::Arc;

use hp_common::{Error, PredictionId, PredictionRecord, PredictionRequest, Result};
use hp_store::PredictionLog;
use serde::Serialize;
use tracing::{debug, warn};

use crate::context::ServingContext;
use crate::errors;

/// Result of persisting one prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LogOutcome {
    Logged { id: PredictionId },
    Failed { reason: String },
}

impl LogOutcome {
    pub fn is_logged(&self) -> bool {
        matches!(self, LogOutcome::Logged { .. })
    }
}

/// A served prediction and what happened when it was logged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub value: f64,
    pub log: LogOutcome,
}

/// Serving endpoint plus history queries over the same log.
pub struct PredictionService {
    context: Arc<ServingContext>,
    log: Arc<dyn PredictionLog>,
    history_limit: usize,
}

impl PredictionService {
    pub fn new(
        context: Arc<ServingContext>,
        log: Arc<dyn PredictionLog>,
        history_limit: usize,
    ) -> Self {
        Self {
            context,
            log,
            history_limit,
        }
    }

    pub fn context(&self) -> &ServingContext {
        &self.context
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Score a request and append it to the log.
    ///
    /// Errors only for normalization or scoring faults; in that case nothing
    /// is logged.
    pub fn predict(&self, request: &PredictionRequest) -> Result<Prediction> {
        let value = self.context.score(request)?;
        let log = self.record(request, value);
        match &log {
            LogOutcome::Logged { id } => debug!(prediction_id = %id, "prediction logged"),
            LogOutcome::Failed { reason } => {
                warn!(reason = %reason, predicted_value = value, "prediction not logged")
            }
        }
        Ok(Prediction { value, log })
    }

    fn record(&self, request: &PredictionRequest, value: f64) -> LogOutcome {
        match self.log.append(request, value) {
            Ok(id) => LogOutcome::Logged { id },
            Err(e) => LogOutcome::Failed {
                reason: e.to_string(),
            },
        }
    }

    /// Most recent predictions, newest first, bounded by the history limit.
    pub fn history(&self) -> Result<Vec<PredictionRecord>> {
        self.history_with_limit(self.history_limit)
    }

    /// Like [`history`](Self::history) with a caller-chosen bound that can
    /// only tighten the configured limit.
    pub fn history_with_limit(&self, limit: usize) -> Result<Vec<PredictionRecord>> {
        self.log
            .list_recent(limit.min(self.history_limit))
            .map_err(errors::store)
    }

    /// One prediction by id. A missing id is [`Error::PredictionNotFound`].
    pub fn history_by_id(&self, id: PredictionId) -> Result<PredictionRecord> {
        self.log
            .get(id)
            .map_err(errors::store)?
            .ok_or(Error::PredictionNotFound { id: id.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{context_with, income_context, RecordingLog, UnavailableLog};
    use hp_store::SqliteLog;

    fn service_with(log: Arc<dyn PredictionLog>) -> PredictionService {
        PredictionService::new(Arc::new(income_context()), log, 10)
    }

    #[test]
    fn predict_logs_and_returns_value() {
        let log = Arc::new(RecordingLog::default());
        let service = service_with(log.clone());
        let prediction = service.predict(&PredictionRequest::example()).unwrap();

        assert!((prediction.value - (100_000.0 + 40_000.0 * 8.3252)).abs() < 1e-6);
        assert_eq!(prediction.log, LogOutcome::Logged { id: PredictionId(1) });
        let records = log.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].predicted_value, prediction.value);
    }

    #[test]
    fn predict_survives_store_outage() {
        let service = service_with(Arc::new(UnavailableLog));
        let prediction = service.predict(&PredictionRequest::example()).unwrap();
        assert!(prediction.value.is_finite());
        assert!(matches!(prediction.log, LogOutcome::Failed { ref reason } if reason.contains("refused")));
    }

    #[test]
    fn scoring_fault_writes_nothing() {
        let log = Arc::new(RecordingLog::default());
        let service = PredictionService::new(Arc::new(context_with(0.0, vec![1.0; 2])), log.clone(), 10);
        let err = service.predict(&PredictionRequest::example()).unwrap_err();
        assert!(matches!(err, Error::Scoring(_)));
        assert!(log.records.lock().unwrap().is_empty());
    }

    #[test]
    fn normalization_fault_writes_nothing() {
        let log = Arc::new(RecordingLog::default());
        let service = service_with(log.clone());
        let request = PredictionRequest {
            latitude: f64::NAN,
            ..PredictionRequest::example()
        };
        assert!(matches!(
            service.predict(&request).unwrap_err(),
            Error::Normalization(_)
        ));
        assert!(log.records.lock().unwrap().is_empty());
    }

    #[test]
    fn history_is_bounded_and_newest_first() {
        let service = service_with(Arc::new(SqliteLog::open_in_memory().unwrap()));
        for _ in 0..12 {
            service.predict(&PredictionRequest::example()).unwrap();
        }
        let history = service.history().unwrap();
        assert_eq!(history.len(), 10);
        assert!(history.windows(2).all(|w| w[0].id > w[1].id));
        assert_eq!(service.history_with_limit(3).unwrap().len(), 3);
        assert_eq!(service.history_with_limit(50).unwrap().len(), 10);
    }

    #[test]
    fn history_by_id_distinguishes_missing_from_outage() {
        let service = service_with(Arc::new(SqliteLog::open_in_memory().unwrap()));
        let prediction = service.predict(&PredictionRequest::example()).unwrap();
        let LogOutcome::Logged { id } = prediction.log else {
            panic!("expected logged prediction");
        };
        assert_eq!(service.history_by_id(id).unwrap().id, id);
        assert!(matches!(
            service.history_by_id(PredictionId(id.0 + 100)).unwrap_err(),
            Error::PredictionNotFound { .. }
        ));

        let down = service_with(Arc::new(UnavailableLog));
        let err = down.history_by_id(PredictionId(1)).unwrap_err();
        assert!(err.is_store_fault());
    }

    #[test]
    fn next_id_is_previous_max_plus_one() {
        let store = Arc::new(SqliteLog::open_in_memory().unwrap());
        let service = service_with(store.clone());
        service.predict(&PredictionRequest::example()).unwrap();
        let before = store.max_id().unwrap().unwrap();

        let prediction = service.predict(&PredictionRequest::example()).unwrap();
        let record = service.history().unwrap().remove(0);
        assert_eq!(record.id, PredictionId(before.0 + 1));
        assert_eq!(record.predicted_value, prediction.value);
    }
}
