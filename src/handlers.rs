use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
};
use chrono::Local;
use serde::Deserialize;
use std::sync::Arc;
use tera::Context;
use tracing::{error, info};

use crate::analysis::analyze_trends;
use crate::data::{FlightQuery, CITIES, DEFAULT_DAYS_BACK};
use crate::error::FlightTrendsError;
use crate::fetcher::fetch_flight_data;
use crate::models::AnalysisResponse;
use crate::state::AppState;

/// Body of `POST /api/analyze`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default, deserialize_with = "empty_string_as_none_str")]
    pub origin: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none_str")]
    pub destination: Option<String>,
    /// The dashboard posts the raw input value, so numeric strings are accepted.
    #[serde(default, deserialize_with = "number_or_numeric_string")]
    pub days_back: Option<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    Text(String),
}

fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<NumberOrString> = Option::deserialize(deserializer)?;
    match opt {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn empty_string_as_none_str<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => Ok(Some(s)),
    }
}

fn render_template(
    tera: &tera::Tera,
    template: &str,
    context: &Context,
) -> Result<Html<String>, (StatusCode, &'static str)> {
    tera.render(template, context).map(Html).map_err(|e| {
        error!("Template render error for '{}': {}", template, e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Render error")
    })
}

/// GET / - Dashboard page.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut context = Context::new();
    context.insert("default_days_back", &DEFAULT_DAYS_BACK);
    render_template(&state.tera, "index.html", &context)
}

/// POST /api/analyze - Simulated flight trends plus a narrative insight.
pub async fn api_analyze(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, FlightTrendsError> {
    let Json(request) =
        payload.map_err(|e| FlightTrendsError::InvalidRequest(e.body_text()))?;
    let query = FlightQuery::new(request.origin, request.destination, request.days_back)?;

    let flights = fetch_flight_data(state.flights.as_ref(), &query, Local::now().date_naive());
    info!(
        "Analyzing {} flights (origin={:?}, destination={:?}, days_back={})",
        flights.len(),
        query.origin,
        query.destination,
        query.days_back
    );

    let summary = analyze_trends(&flights)?;
    let ai_insights = state.insights.request_insight(&summary).await;

    Ok(Json(AnalysisResponse {
        summary,
        ai_insights,
    }))
}

/// GET /api/cities - Cities for the dashboard's route filter selects.
pub async fn api_cities() -> impl IntoResponse {
    Json(CITIES)
}
