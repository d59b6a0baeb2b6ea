//! Startup loading of the two trainer artifacts.
//!
//! Both files must be present, parse, and agree on shape before the service
//! accepts traffic. Any failure here is fatal.

use std::fs;
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::artifact::LinearModel;
use crate::columns::ModelColumns;
use crate::error::ArtifactError;

/// SHA-256 digests of the loaded artifact files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactFingerprint {
    pub model_sha256: String,
    pub columns_sha256: String,
}

/// Column schema and model that were validated against each other.
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    pub columns: ModelColumns,
    pub model: LinearModel,
    pub fingerprint: Option<ArtifactFingerprint>,
}

impl ArtifactSet {
    /// Load both artifacts from disk and cross-check them.
    pub fn load(model_path: &Path, columns_path: &Path) -> Result<Self, ArtifactError> {
        let columns = ModelColumns::load(columns_path)?;
        debug!(path = %columns_path.display(), columns = columns.len(), "loaded column schema");

        let model = LinearModel::load(model_path)?;
        debug!(path = %model_path.display(), coefficients = model.coefficients.len(), "loaded model");

        let mut set = Self::from_parts(columns, model)?;
        let fingerprint = ArtifactFingerprint {
            model_sha256: sha256_file(model_path)?,
            columns_sha256: sha256_file(columns_path)?,
        };
        info!(
            model_sha256 = %fingerprint.model_sha256,
            columns_sha256 = %fingerprint.columns_sha256,
            features = set.columns.len(),
            "model artifacts ready"
        );
        set.fingerprint = Some(fingerprint);
        Ok(set)
    }

    /// Pair an in-memory schema and model, enforcing that the model was
    /// fitted on exactly this column list.
    pub fn from_parts(columns: ModelColumns, model: LinearModel) -> Result<Self, ArtifactError> {
        model.validate()?;
        if model.coefficients.len() != columns.len() {
            return Err(ArtifactError::ShapeMismatch {
                coefficients: model.coefficients.len(),
                columns: columns.len(),
            });
        }
        if let Some(names) = &model.feature_names {
            for (position, (model_name, schema_name)) in
                names.iter().zip(columns.names()).enumerate()
            {
                if model_name != schema_name {
                    return Err(ArtifactError::FeatureNameMismatch {
                        position,
                        model: model_name.clone(),
                        schema: schema_name.clone(),
                    });
                }
            }
        }
        Ok(Self {
            columns,
            model,
            fingerprint: None,
        })
    }
}

fn sha256_file(path: &Path) -> Result<String, ArtifactError> {
    let bytes = fs::read(path).map_err(|e| ArtifactError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}
