mod analysis;
mod data;
mod error;
mod fetcher;
mod handlers;
mod insights;
mod models;
mod state;

use anyhow::Context as _;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tera::Tera;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::insights::InsightClient;
use crate::state::{AppState, Config};

fn app(state: Arc<AppState>, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/analyze", post(handlers::api_analyze))
        .route("/api/cities", get(handlers::api_cities))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flight_trends=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env();

    let tera = match Tera::new(&config.templates_glob) {
        Ok(t) => t,
        Err(e) => {
            error!("Template parsing error(s): {}", e);
            std::process::exit(1);
        }
    };

    let insights = InsightClient::new(config.insights.clone())
        .context("failed to build insight client")?;
    if insights.is_enabled() {
        info!("Narrative insights enabled (model {})", config.insights.model);
    } else {
        warn!("OPENAI_API_KEY not set, narrative insights disabled");
    }
    if config.aviation_api_key.is_some() {
        info!("AVIATION_API_KEY found; flight data is still simulated");
    }

    let state = Arc::new(AppState::new(tera, insights));
    let router = app(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address))?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::insights::UNAVAILABLE_MESSAGE;

    fn test_app() -> Router {
        let mut tera = Tera::default();
        tera.add_raw_template(
            "index.html",
            r#"<input id="days-back" value="{{ default_days_back }}">"#,
        )
        .unwrap();
        let state = Arc::new(AppState::new(tera, InsightClient::disabled()));
        app(state, "static")
    }

    async fn post_analyze(body: &str) -> (StatusCode, Value) {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/analyze")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_analyze_route_filter() {
        let (status, body) =
            post_analyze(r#"{"origin": "Sydney", "destination": "Melbourne", "days_back": 30}"#)
                .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_flights"], 20);
        assert_eq!(body["popular_routes"][0][0], "Sydney → Melbourne");
        assert_eq!(body["popular_routes"][0][1], 20);
        assert_eq!(body["ai_insights"], UNAVAILABLE_MESSAGE);
    }

    #[tokio::test]
    async fn test_analyze_defaults() {
        let (status, body) = post_analyze(r#"{"origin": "", "days_back": "30"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_flights"], 200);
        assert_eq!(body["airline_share"].as_array().unwrap().len(), 4);
        assert!(body["daily_prices"][0]["date_str"].is_string());
        assert!(body["daily_demand"][0]["flight_count"].is_number());
    }

    #[tokio::test]
    async fn test_analyze_unknown_route_is_empty_summary() {
        let (status, body) = post_analyze(r#"{"origin": "Darwin"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_flights"], 0);
        assert_eq!(body["avg_price"], 0.0);
        assert_eq!(body["price_range"], "$0 - $0");
        assert!(body["popular_routes"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_analyze_rejects_non_positive_days() {
        let (status, body) = post_analyze(r#"{"days_back": 0}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request");
        assert_eq!(body["details"], "days_back must be between 1 and 1000000");
    }

    #[tokio::test]
    async fn test_analyze_accepts_long_window() {
        let (status, body) = post_analyze(r#"{"days_back": 20000}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_flights"], 200);
        assert_eq!(body["daily_demand"].as_array().unwrap().len(), 200);
    }

    #[tokio::test]
    async fn test_analyze_rejects_malformed_json() {
        let (status, body) = post_analyze("{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request");
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn test_cities() {
        let response = test_app()
            .oneshot(Request::builder().uri("/api/cities").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let cities: Vec<String> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(cities.len(), 8);
        assert_eq!(cities[0], "Sydney");
        assert_eq!(cities[7], "Canberra");
    }

    #[tokio::test]
    async fn test_index_renders() {
        let response = test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(html, r#"<input id="days-back" value="30">"#);
    }
}
