//! House price model artifacts.
//!
//! This crate provides:
//! - The training-time column schema ([`ModelColumns`])
//! - The fitted linear model and the [`Regressor`] seam it sits behind
//! - Feature normalization from a request to a schema-aligned vector
//! - Artifact loading and fingerprinting

pub mod artifact;
pub mod columns;
pub mod error;
pub mod loader;
pub mod normalize;

pub use artifact::{LinearModel, Regressor};
pub use columns::ModelColumns;
pub use error::{ArtifactError, NormalizeError, ScoreError};
pub use loader::{ArtifactFingerprint, ArtifactSet};
pub use normalize::{indicator_column, normalize, FeatureVector};

