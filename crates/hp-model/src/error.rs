//! Error types for artifact loading, normalization, and scoring.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating artifacts. All of them are
/// startup faults.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("column schema is empty")]
    EmptyColumns,

    #[error("column schema lists {0:?} more than once")]
    DuplicateColumn(String),

    #[error("unsupported model type: {0}")]
    UnsupportedModelType(String),

    #[error("incompatible artifact schema version: {0}")]
    IncompatibleSchema(String),

    #[error("model has {coefficients} coefficients but the column schema has {columns} columns")]
    ShapeMismatch { coefficients: usize, columns: usize },

    #[error("model feature {position} is {model:?} but the column schema has {schema:?}")]
    FeatureNameMismatch {
        position: usize,
        model: String,
        schema: String,
    },

    #[error("model parameter {0} is not finite")]
    NonFiniteParameter(String),
}

/// Per-request normalization faults.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("field {column} is not a finite number ({value})")]
    NonFinite { column: String, value: f64 },
}

/// Per-request scoring faults.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    #[error("feature vector has {actual} values, model expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("feature {position} is {actual:?}, model expects {expected:?}")]
    ColumnMismatch {
        position: usize,
        expected: String,
        actual: String,
    },

    #[error("prediction is not a finite number ({0})")]
    NonFinite(f64),
}
