//! Request routing and status mapping, independent of the socket layer.
//!
//! [`handle`] turns a method, URL and body into a [`Reply`]. Every body is
//! JSON; failures use the `{"detail": ...}` shape.

use hp_common::{
    Error, ErrorDetail, PredictionId, PredictionRequest, PredictionResponse, WelcomeMessage,
};
use serde::Serialize;
use thiserror::Error;
use tiny_http::Method;
use tracing::{debug, error};

use crate::service::PredictionService;

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Status and serialized JSON body of one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self { status, body },
            Err(e) => {
                error!(error = %e, "failed to serialize response body");
                Self {
                    status: 500,
                    body: r#"{"detail":"Internal Server Error"}"#.to_string(),
                }
            }
        }
    }

    pub fn error(err: &ServiceError) -> Self {
        Self::json(err.status(), &ErrorDetail::new(err.to_string()))
    }
}

/// Everything an endpoint can answer with besides success.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidBody(String),

    #[error("Invalid prediction id: {0}")]
    InvalidId(String),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Prediction error: {0}")]
    Prediction(Error),

    #[error("Prediction not found")]
    PredictionNotFound,

    #[error("Database connection error. Please try again.")]
    DatabaseConnection(Error),

    #[error("Database error: {0}")]
    Database(Error),

    #[error("Not Found")]
    RouteNotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed,
}

impl ServiceError {
    pub fn status(&self) -> u16 {
        match self {
            ServiceError::InvalidBody(_) | ServiceError::InvalidId(_) => 422,
            ServiceError::PayloadTooLarge => 413,
            ServiceError::PredictionNotFound | ServiceError::RouteNotFound => 404,
            ServiceError::MethodNotAllowed => 405,
            ServiceError::Prediction(_)
            | ServiceError::DatabaseConnection(_)
            | ServiceError::Database(_) => 500,
        }
    }

    /// Classify a history lookup failure.
    fn from_lookup(err: Error) -> Self {
        match err {
            Error::PredictionNotFound { .. } => ServiceError::PredictionNotFound,
            e @ (Error::StoreConnection(_) | Error::StoreUnreachable { .. }) => {
                ServiceError::DatabaseConnection(e)
            }
            e => ServiceError::Database(e),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route<'a> {
    Root,
    Docs,
    Predict,
    History,
    HistoryById(&'a str),
}

impl<'a> Route<'a> {
    fn parse(path: &'a str) -> Option<Self> {
        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path,
        };
        match path {
            "/" => Some(Route::Root),
            "/docs" => Some(Route::Docs),
            "/predict" => Some(Route::Predict),
            "/history" => Some(Route::History),
            _ => path
                .strip_prefix("/history/")
                .filter(|id| !id.is_empty() && !id.contains('/'))
                .map(Route::HistoryById),
        }
    }

    fn allows(self, method: &Method) -> bool {
        match self {
            Route::Predict => *method == Method::Post,
            _ => *method == Method::Get,
        }
    }
}

/// Strip the query string and fragment.
fn path_of(url: &str) -> &str {
    url.split(|c| c == '?' || c == '#').next().unwrap_or(url)
}

/// Dispatch one request.
pub fn handle(service: &PredictionService, method: &Method, url: &str, body: &[u8]) -> Reply {
    let Some(route) = Route::parse(path_of(url)) else {
        return Reply::error(&ServiceError::RouteNotFound);
    };
    if !route.allows(method) {
        return Reply::error(&ServiceError::MethodNotAllowed);
    }

    let outcome = match route {
        Route::Root => Ok(Reply::json(200, &WelcomeMessage::default())),
        Route::Docs => Ok(Reply::json(200, &crate::commands::schema::api_document())),
        Route::Predict => predict(service, body),
        Route::History => history(service),
        Route::HistoryById(raw) => history_by_id(service, raw),
    };

    outcome.unwrap_or_else(|err| {
        if err.status() >= 500 {
            error!(status = err.status(), error = %err, "request failed");
        } else {
            debug!(status = err.status(), error = %err, "request rejected");
        }
        Reply::error(&err)
    })
}

fn predict(service: &PredictionService, body: &[u8]) -> Result<Reply, ServiceError> {
    let request = parse_request(body)?;
    let prediction = service.predict(&request).map_err(ServiceError::Prediction)?;
    Ok(Reply::json(
        200,
        &PredictionResponse {
            predicted_median_house_value: prediction.value,
        },
    ))
}

/// Decode a `PredictionRequest`, rejecting anything malformed before it
/// reaches the normalizer.
pub fn parse_request(body: &[u8]) -> Result<PredictionRequest, ServiceError> {
    serde_json::from_slice(body).map_err(|e| ServiceError::InvalidBody(e.to_string()))
}

fn history(service: &PredictionService) -> Result<Reply, ServiceError> {
    let records = service.history().map_err(ServiceError::Database)?;
    Ok(Reply::json(200, &records))
}

fn history_by_id(service: &PredictionService, raw: &str) -> Result<Reply, ServiceError> {
    let id: PredictionId = raw
        .parse()
        .map_err(|_| ServiceError::InvalidId(raw.to_string()))?;
    let record = service
        .history_by_id(id)
        .map_err(ServiceError::from_lookup)?;
    Ok(Reply::json(200, &record))
}
