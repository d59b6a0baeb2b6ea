//! Conversions from per-crate errors into the unified [`Error`].

use hp_common::Error;
use hp_config::ConfigError;
use hp_model::{ArtifactError, NormalizeError, ScoreError};
use hp_store::StoreError;

pub(crate) fn config(err: ConfigError) -> Error {
    Error::Config(err.to_string())
}

pub(crate) fn artifact(err: ArtifactError) -> Error {
    Error::Artifact(err.to_string())
}

pub(crate) fn normalize(err: NormalizeError) -> Error {
    Error::Normalization(err.to_string())
}

pub(crate) fn score(err: ScoreError) -> Error {
    Error::Scoring(err.to_string())
}

pub(crate) fn store(err: StoreError) -> Error {
    match err {
        StoreError::Unreachable {
            attempts,
            last_error,
        } => Error::StoreUnreachable {
            attempts,
            reason: last_error,
        },
        e if e.is_connection_fault() => Error::StoreConnection(e.to_string()),
        e => Error::Store(e.to_string()),
    }
}
