//! Fitted regression model.
//!
//! The serving path only needs "vector in, scalar out", so the model sits
//! behind [`Regressor`]. [`LinearModel`] is the one implementation the
//! offline trainer produces: an intercept plus one coefficient per schema
//! column.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, ScoreError};
use crate::normalize::FeatureVector;

/// Model type tag written by the trainer.
pub const LINEAR_REGRESSION: &str = "linear_regression";

/// A fitted model that scores one aligned feature vector.
///
/// Implementations must be pure: the same vector always scores the same.
pub trait Regressor: Send + Sync {
    fn predict(&self, features: &FeatureVector<'_>) -> Result<f64, ScoreError>;

    /// Number of input features the model was fitted on.
    fn n_features(&self) -> usize;

    /// Column names recorded at fit time, when the artifact carries them.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }
}

/// Ordinary least squares model: `intercept + Σ coefficient_i · x_i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    #[serde(default = "default_model_type")]
    pub model_type: String,

    #[serde(default)]
    pub schema_version: Option<String>,

    pub intercept: f64,

    pub coefficients: Vec<f64>,

    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

fn default_model_type() -> String {
    LINEAR_REGRESSION.to_string()
}

impl LinearModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            model_type: default_model_type(),
            schema_version: None,
            intercept,
            coefficients,
            feature_names: None,
        }
    }

    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = Some(names);
        self
    }

    /// Load and validate a model written by the trainer.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let content = fs::read_to_string(path).map_err(|e| ArtifactError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let model: LinearModel =
            serde_json::from_str(&content).map_err(|e| ArtifactError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;
        model.validate()?;
        Ok(model)
    }

    /// Check the parameters themselves; shape against a schema is checked
    /// by the loader.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.model_type != LINEAR_REGRESSION {
            return Err(ArtifactError::UnsupportedModelType(self.model_type.clone()));
        }
        if let Some(version) = &self.schema_version {
            if !hp_common::schema::is_compatible(version) {
                return Err(ArtifactError::IncompatibleSchema(version.clone()));
            }
        }
        if !self.intercept.is_finite() {
            return Err(ArtifactError::NonFiniteParameter("intercept".to_string()));
        }
        if let Some(i) = self.coefficients.iter().position(|c| !c.is_finite()) {
            return Err(ArtifactError::NonFiniteParameter(format!("coefficients[{i}]")));
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.coefficients.len() {
                return Err(ArtifactError::ShapeMismatch {
                    coefficients: self.coefficients.len(),
                    columns: names.len(),
                });
            }
        }
        Ok(())
    }
}

impl Regressor for LinearModel {
    fn predict(&self, features: &FeatureVector<'_>) -> Result<f64, ScoreError> {
        if features.len() != self.coefficients.len() {
            return Err(ScoreError::DimensionMismatch {
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }
        if let Some(names) = &self.feature_names {
            let mismatch = names
                .iter()
                .zip(features.columns())
                .enumerate()
                .find(|(_, (expected, actual))| expected != actual);
            if let Some((position, (expected, actual))) = mismatch {
                return Err(ScoreError::ColumnMismatch {
                    position,
                    expected: expected.clone(),
                    actual: actual.clone(),
                });
            }
        }

        let value = self
            .coefficients
            .iter()
            .zip(features.values())
            .fold(self.intercept, |acc, (w, x)| acc + w * x);

        if !value.is_finite() {
            return Err(ScoreError::NonFinite(value));
        }
        Ok(value)
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }
}
