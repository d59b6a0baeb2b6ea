//! Wire and storage shapes for predictions.
//!
//! Field names are part of the public HTTP contract and the column names of
//! the prediction log table; do not rename them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::id::PredictionId;

/// Name of the single categorical input field.
pub const CATEGORICAL_FIELD: &str = "ocean_proximity";

/// Names of the numeric input fields, in dataset order.
pub const NUMERIC_FIELDS: [&str; 8] = [
    "longitude",
    "latitude",
    "housing_median_age",
    "total_rooms",
    "total_bedrooms",
    "population",
    "households",
    "median_income",
];

/// Body of `POST /predict`.
///
/// `ocean_proximity` is kept as the raw label so unrecognized values reach
/// the normalizer instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(example = "PredictionRequest::example")]
pub struct PredictionRequest {
    pub longitude: f64,
    pub latitude: f64,
    pub housing_median_age: f64,
    pub total_rooms: f64,
    pub total_bedrooms: f64,
    pub population: f64,
    pub households: f64,
    pub median_income: f64,
    pub ocean_proximity: String,
}

impl PredictionRequest {
    /// The documented sample block group (Berkeley hills, "NEAR BAY").
    pub fn example() -> Self {
        Self {
            longitude: -122.23,
            latitude: 37.88,
            housing_median_age: 41.0,
            total_rooms: 880.0,
            total_bedrooms: 129.0,
            population: 322.0,
            households: 126.0,
            median_income: 8.3252,
            ocean_proximity: OceanProximity::NearBay.as_str().to_string(),
        }
    }

    /// Numeric inputs paired with their field names, in [`NUMERIC_FIELDS`] order.
    pub fn numeric_fields(&self) -> [(&'static str, f64); 8] {
        [
            (NUMERIC_FIELDS[0], self.longitude),
            (NUMERIC_FIELDS[1], self.latitude),
            (NUMERIC_FIELDS[2], self.housing_median_age),
            (NUMERIC_FIELDS[3], self.total_rooms),
            (NUMERIC_FIELDS[4], self.total_bedrooms),
            (NUMERIC_FIELDS[5], self.population),
            (NUMERIC_FIELDS[6], self.households),
            (NUMERIC_FIELDS[7], self.median_income),
        ]
    }

    /// The categorical label if it is one of the known values.
    pub fn proximity(&self) -> Option<OceanProximity> {
        OceanProximity::parse(&self.ocean_proximity)
    }
}

/// Known proximity-to-ocean labels from the training dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OceanProximity {
    LessThanOneHourOcean,
    Inland,
    Island,
    NearBay,
    NearOcean,
}

impl OceanProximity {
    /// All labels in the lexical order used when the indicators were built.
    pub const ALL: [OceanProximity; 5] = [
        OceanProximity::LessThanOneHourOcean,
        OceanProximity::Inland,
        OceanProximity::Island,
        OceanProximity::NearBay,
        OceanProximity::NearOcean,
    ];

    /// Reference category dropped at training time (first in lexical order).
    pub const BASELINE: OceanProximity = OceanProximity::LessThanOneHourOcean;

    pub fn as_str(self) -> &'static str {
        match self {
            OceanProximity::LessThanOneHourOcean => "<1H OCEAN",
            OceanProximity::Inland => "INLAND",
            OceanProximity::Island => "ISLAND",
            OceanProximity::NearBay => "NEAR BAY",
            OceanProximity::NearOcean => "NEAR OCEAN",
        }
    }

    /// Exact, case-sensitive match against the training labels.
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == label)
    }
}

impl fmt::Display for OceanProximity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the prediction log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: PredictionId,
    pub longitude: f64,
    pub latitude: f64,
    pub housing_median_age: f64,
    pub total_rooms: f64,
    pub total_bedrooms: f64,
    pub population: f64,
    pub households: f64,
    pub median_income: f64,
    pub ocean_proximity: String,
    pub predicted_value: f64,
    /// RFC 3339 UTC timestamp of the insert.
    pub created_at: String,
}

impl PredictionRecord {
    /// The request this record was logged from.
    pub fn request(&self) -> PredictionRequest {
        PredictionRequest {
            longitude: self.longitude,
            latitude: self.latitude,
            housing_median_age: self.housing_median_age,
            total_rooms: self.total_rooms,
            total_bedrooms: self.total_bedrooms,
            population: self.population,
            households: self.households,
            median_income: self.median_income,
            ocean_proximity: self.ocean_proximity.clone(),
        }
    }
}

/// Success body of `POST /predict`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PredictionResponse {
    pub predicted_median_house_value: f64,
}

/// Error body for every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeMessage {
    pub message: String,
}

impl Default for WelcomeMessage {
    fn default() -> Self {
        Self {
            message: "Welcome! Go to /docs to use the API.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_round_trips_field_names() {
        let json = serde_json::to_value(PredictionRequest::example()).unwrap();
        for name in NUMERIC_FIELDS {
            assert!(json.get(name).is_some(), "missing {name}");
        }
        assert_eq!(json[CATEGORICAL_FIELD], "NEAR BAY");
    }

    #[test]
    fn missing_field_is_rejected() {
        let body = r#"{"longitude": -122.23, "latitude": 37.88}"#;
        let err = serde_json::from_str::<PredictionRequest>(body).unwrap_err();
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn unknown_label_still_deserializes() {
        let mut json = serde_json::to_value(PredictionRequest::example()).unwrap();
        json[CATEGORICAL_FIELD] = "MOON BASE".into();
        let req: PredictionRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.proximity(), None);
    }

    #[test]
    fn proximity_parse_is_exact() {
        assert_eq!(OceanProximity::parse("INLAND"), Some(OceanProximity::Inland));
        assert_eq!(OceanProximity::parse("inland"), None);
        assert_eq!(OceanProximity::parse("<1H OCEAN"), Some(OceanProximity::BASELINE));
    }

    #[test]
    fn numeric_fields_follow_dataset_order() {
        let req = PredictionRequest::example();
        let fields = req.numeric_fields();
        assert_eq!(fields[0], ("longitude", -122.23));
        assert_eq!(fields[7], ("median_income", 8.3252));
    }

    #[test]
    fn record_serializes_integer_id() {
        let req = PredictionRequest::example();
        let record = PredictionRecord {
            id: PredictionId(3),
            longitude: req.longitude,
            latitude: req.latitude,
            housing_median_age: req.housing_median_age,
            total_rooms: req.total_rooms,
            total_bedrooms: req.total_bedrooms,
            population: req.population,
            households: req.households,
            median_income: req.median_income,
            ocean_proximity: req.ocean_proximity.clone(),
            predicted_value: 1.5,
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(record.request(), req);
    }

    #[test]
    fn welcome_message_text() {
        let json = serde_json::to_string(&WelcomeMessage::default()).unwrap();
        assert_eq!(json, r#"{"message":"Welcome! Go to /docs to use the API."}"#);
    }
}
