//! Feature normalization: one request in, one schema-aligned vector out.
//!
//! The categorical field is expanded to a single `ocean_proximity_<label>`
//! indicator set to 1. Every schema column the expansion does not produce is
//! zero-filled, every produced column the schema does not list is dropped, and
//! the result follows schema order. The baseline label has no column in the
//! schema, so it (and any label the schema does not know) yields all-zero
//! indicators.

use hp_common::{PredictionRequest, CATEGORICAL_FIELD};

use crate::columns::ModelColumns;
use crate::error::NormalizeError;

/// Numeric input aligned column-for-column with a [`ModelColumns`] schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector<'a> {
    columns: &'a [String],
    values: Vec<f64>,
}

impl<'a> FeatureVector<'a> {
    pub fn columns(&self) -> &'a [String] {
        self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a named column, if the schema has it.
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, f64)> + '_ {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// Column name the one-hot expansion produces for a categorical label.
pub fn indicator_column(label: &str) -> String {
    format!("{}_{}", CATEGORICAL_FIELD, label)
}

/// Align a request with the training-time schema.
pub fn normalize<'a>(
    request: &PredictionRequest,
    schema: &'a ModelColumns,
) -> Result<FeatureVector<'a>, NormalizeError> {
    let numeric = request.numeric_fields();
    if let Some((column, value)) = numeric.iter().find(|(_, v)| !v.is_finite()) {
        return Err(NormalizeError::NonFinite {
            column: (*column).to_string(),
            value: *value,
        });
    }

    let indicator = indicator_column(&request.ocean_proximity);
    let values = schema
        .names()
        .iter()
        .map(|column| {
            if *column == indicator {
                return 1.0;
            }
            numeric
                .iter()
                .find(|(name, _)| name == column)
                .map_or(0.0, |(_, value)| *value)
        })
        .collect();

    Ok(FeatureVector {
        columns: schema.names(),
        values,
    })
}
