//! Immutable serving state built once at startup.

use hp_common::{PredictionRequest, Result};
use hp_config::ServerConfig;
use hp_model::{normalize, ArtifactFingerprint, ArtifactSet, ModelColumns, Regressor};
use tracing::debug;

use crate::errors;

/// Column schema and fitted model shared read-only by every request.
pub struct ServingContext {
    columns: ModelColumns,
    model: Box<dyn Regressor>,
    fingerprint: Option<ArtifactFingerprint>,
}

impl std::fmt::Debug for ServingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServingContext")
            .field("columns", &self.columns)
            .field("n_features", &self.model.n_features())
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}

impl ServingContext {
    pub fn new(columns: ModelColumns, model: impl Regressor + 'static) -> Self {
        Self {
            columns,
            model: Box::new(model),
            fingerprint: None,
        }
    }

    pub fn from_artifacts(artifacts: ArtifactSet) -> Self {
        Self {
            columns: artifacts.columns,
            model: Box::new(artifacts.model),
            fingerprint: artifacts.fingerprint,
        }
    }

    /// Load both artifacts named by the config. Failure is a startup fault.
    pub fn load(config: &ServerConfig) -> Result<Self> {
        let artifacts =
            ArtifactSet::load(&config.model_path, &config.columns_path).map_err(errors::artifact)?;
        Ok(Self::from_artifacts(artifacts))
    }

    pub fn columns(&self) -> &ModelColumns {
        &self.columns
    }

    pub fn model(&self) -> &dyn Regressor {
        self.model.as_ref()
    }

    pub fn fingerprint(&self) -> Option<&ArtifactFingerprint> {
        self.fingerprint.as_ref()
    }

    /// Normalize and score one request. No side effects.
    pub fn score(&self, request: &PredictionRequest) -> Result<f64> {
        let vector = normalize(request, &self.columns).map_err(errors::normalize)?;
        if request.proximity().is_none() {
            debug!(
                ocean_proximity = %request.ocean_proximity,
                "unrecognized ocean_proximity, scoring with baseline indicators"
            );
        }
        let value = self.model.predict(&vector).map_err(errors::score)?;
        debug!(predicted_value = value, "scored request");
        Ok(value)
    }
}
