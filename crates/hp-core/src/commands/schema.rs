//! JSON Schema of the HTTP bodies, for `schema` and `GET /docs`.

use hp_common::{OutputFormat, PredictionRequest, PredictionResponse, Result};
use schemars::schema_for;
use serde_json::{json, Value};

use super::emit;
use crate::exit_codes::ExitCode;

/// Schema of the `POST /predict` body.
pub fn request_schema() -> Value {
    serde_json::to_value(schema_for!(PredictionRequest)).unwrap_or(Value::Null)
}

/// Endpoint listing with request and response schemas.
pub fn api_document() -> Value {
    json!({
        "title": "House Price Prediction API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            {"method": "GET", "path": "/", "description": "Welcome message"},
            {"method": "POST", "path": "/predict", "description": "Predict the median house value of one block group"},
            {"method": "GET", "path": "/history", "description": "Most recent predictions, newest first"},
            {"method": "GET", "path": "/history/{id}", "description": "One logged prediction"},
        ],
        "request_schema": request_schema(),
        "response_schema": serde_json::to_value(schema_for!(PredictionResponse)).unwrap_or(Value::Null),
        "example": PredictionRequest::example(),
    })
}

pub fn run(format: OutputFormat) -> Result<ExitCode> {
    emit(format, &request_schema())?;
    Ok(ExitCode::Clean)
}
