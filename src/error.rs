//! Error types for the flight trends service.
//!
//! Two failure domains never surface here: a failing flight data source
//! falls back to simulated data, and a failing insight service is turned
//! into a readable message. Everything else ends up as one of these
//! variants and is mapped to a JSON response at the HTTP boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

/// Custom error type for flight trends operations.
#[derive(Debug, Error)]
pub enum FlightTrendsError {
    /// Error making HTTP requests to an upstream service.
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Upstream API answered with something we cannot use.
    #[error("Invalid API response: {0}")]
    InvalidApiResponse(String),

    /// Error while aggregating flight data.
    #[error("Aggregation error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Request body failed parsing or validation.
    #[error("{0}")]
    InvalidRequest(String),
}

impl IntoResponse for FlightTrendsError {
    fn into_response(self) -> Response {
        let (status, label) = match &self {
            FlightTrendsError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "Invalid request"),
            other => {
                error!("Analysis failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, "Analysis failed")
            }
        };

        let body = Json(serde_json::json!({
            "error": label,
            "details": self.to_string(),
        }));

        (status, body).into_response()
    }
}
