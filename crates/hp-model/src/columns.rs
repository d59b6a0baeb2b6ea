//! Training-time column schema.
//!
//! The schema is the exact, ordered list of input columns the fitted model
//! was trained on. It is loaded once at startup and never changes.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use hp_common::CATEGORICAL_FIELD;

use crate::error::ArtifactError;

/// Ordered, non-empty, duplicate-free list of model input columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelColumns {
    names: Vec<String>,
}

impl ModelColumns {
    /// Build a schema, rejecting empty lists and repeated names.
    pub fn new(names: Vec<String>) -> Result<Self, ArtifactError> {
        if names.is_empty() {
            return Err(ArtifactError::EmptyColumns);
        }
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(ArtifactError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Self { names })
    }

    /// Load a schema from a JSON array of column names.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let content = fs::read_to_string(path).map_err(|e| ArtifactError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let names: Vec<String> =
            serde_json::from_str(&content).map_err(|e| ArtifactError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;
        Self::new(names)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// One-hot indicator columns of the categorical field, in schema order.
    pub fn indicator_columns(&self) -> impl Iterator<Item = &str> {
        self.names
            .iter()
            .map(String::as_str)
            .filter(|n| is_indicator(n))
    }
}

fn is_indicator(name: &str) -> bool {
    name.strip_prefix(CATEGORICAL_FIELD)
        .is_some_and(|rest| rest.starts_with('_'))
}
