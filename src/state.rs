use std::env;
use std::sync::Arc;
use std::time::Duration;
use tera::Tera;

use crate::fetcher::{FlightSource, SampleFlights};
use crate::insights::{InsightClient, InsightConfig};

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Application configuration from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP server to.
    pub bind_address: String,
    /// Glob for the HTML templates.
    pub templates_glob: String,
    /// Directory served under `/static`.
    pub static_dir: String,
    /// Aviation data API key. Flight data is simulated, so this is informational.
    pub aviation_api_key: Option<String>,
    /// Language-model settings for the insight client.
    pub insights: InsightConfig,
}

impl Config {
    /// Creates Config from environment variables with defaults.
    pub fn from_env() -> Self {
        let defaults = InsightConfig::default();
        let timeout = env::var("INSIGHT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:5000".into()),
            templates_glob: env::var("TEMPLATES_GLOB")
                .unwrap_or_else(|_| "templates/**/*.html".into()),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "static".into()),
            aviation_api_key: non_empty_var("AVIATION_API_KEY"),
            insights: InsightConfig {
                api_key: non_empty_var("OPENAI_API_KEY"),
                base_url: non_empty_var("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
                model: non_empty_var("OPENAI_MODEL").unwrap_or(defaults.model),
                timeout,
            },
        }
    }
}

/// Shared application state passed to all request handlers.
///
/// Nothing here changes after startup; every request builds its own data.
pub struct AppState {
    /// Template engine for rendering HTML pages.
    pub tera: Tera,
    /// Where flight records come from.
    pub flights: Arc<dyn FlightSource>,
    /// Narrative insight client.
    pub insights: InsightClient,
}

impl AppState {
    pub fn new(tera: Tera, insights: InsightClient) -> Self {
        Self {
            tera,
            flights: Arc::new(SampleFlights),
            insights,
        }
    }
}
