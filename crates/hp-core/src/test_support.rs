//! Shared fixtures for unit tests.

use std::sync::Mutex;

use hp_common::{OceanProximity, PredictionId, PredictionRecord, PredictionRequest, NUMERIC_FIELDS};
use hp_model::{indicator_column, LinearModel, ModelColumns};
use hp_store::{PredictionLog, StoreError};

use crate::context::ServingContext;

/// Column layout the trainer writes for the housing dataset.
pub(crate) fn housing_columns() -> Vec<String> {
    let mut names: Vec<String> = NUMERIC_FIELDS.iter().map(|s| s.to_string()).collect();
    names.extend(
        OceanProximity::ALL
            .iter()
            .filter(|p| **p != OceanProximity::BASELINE)
            .map(|p| indicator_column(p.as_str())),
    );
    names
}

pub(crate) fn context_with(intercept: f64, coefficients: Vec<f64>) -> ServingContext {
    let columns = ModelColumns::new(housing_columns()).unwrap();
    ServingContext::new(columns, LinearModel::new(intercept, coefficients))
}

/// Model that weights median income only: `100_000 + 40_000 · income`.
pub(crate) fn income_context() -> ServingContext {
    let mut coefficients = vec![0.0; 12];
    coefficients[7] = 40_000.0;
    context_with(100_000.0, coefficients)
}

/// Prediction log whose store is always down.
pub(crate) struct UnavailableLog;

impl PredictionLog for UnavailableLog {
    fn append(&self, _: &PredictionRequest, _: f64) -> hp_store::Result<PredictionId> {
        Err(StoreError::Unreachable {
            attempts: 1,
            last_error: "connection refused".into(),
        })
    }

    fn list_recent(&self, _: usize) -> hp_store::Result<Vec<PredictionRecord>> {
        Err(StoreError::LockPoisoned)
    }

    fn get(&self, _: PredictionId) -> hp_store::Result<Option<PredictionRecord>> {
        Err(StoreError::Unreachable {
            attempts: 1,
            last_error: "connection refused".into(),
        })
    }
}

/// In-memory log recording every append, for asserting call counts.
#[derive(Default)]
pub(crate) struct RecordingLog {
    pub(crate) records: Mutex<Vec<PredictionRecord>>,
}

impl PredictionLog for RecordingLog {
    fn append(&self, request: &PredictionRequest, predicted_value: f64) -> hp_store::Result<PredictionId> {
        let mut records = self.records.lock().map_err(|_| StoreError::LockPoisoned)?;
        let id = PredictionId(records.len() as i64 + 1);
        records.push(PredictionRecord {
            id,
            longitude: request.longitude,
            latitude: request.latitude,
            housing_median_age: request.housing_median_age,
            total_rooms: request.total_rooms,
            total_bedrooms: request.total_bedrooms,
            population: request.population,
            households: request.households,
            median_income: request.median_income,
            ocean_proximity: request.ocean_proximity.clone(),
            predicted_value,
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
        });
        Ok(id)
    }

    fn list_recent(&self, limit: usize) -> hp_store::Result<Vec<PredictionRecord>> {
        let records = self.records.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.iter().rev().take(limit).cloned().collect())
    }

    fn get(&self, id: PredictionId) -> hp_store::Result<Option<PredictionRecord>> {
        let records = self.records.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }
}
