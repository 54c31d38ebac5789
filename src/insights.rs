//! Narrative insights from an OpenAI-compatible chat completions API.
//!
//! `request_insight` never fails: a missing key or any service error is
//! reported back as a readable "unavailable" string for the dashboard.

use itertools::Itertools;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::FlightTrendsError;
use crate::models::TrendSummary;

pub const UNAVAILABLE_MESSAGE: &str =
    "AI analysis unavailable: OpenAI API key not set or openai package not installed.";

const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.7;

/// Settings for the language-model client.
#[derive(Debug, Clone)]
pub struct InsightConfig {
    /// `None` disables insight requests entirely.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".into(),
            model: "gpt-3.5-turbo".into(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Client for narrative insights; holds no HTTP client when no key is set.
#[derive(Debug)]
pub struct InsightClient {
    config: InsightConfig,
    http: Option<Client>,
}

impl InsightClient {
    pub fn new(config: InsightConfig) -> Result<Self, FlightTrendsError> {
        let http = match config.api_key {
            Some(_) => Some(
                Client::builder()
                    .user_agent("FlightTrends/1.0.0")
                    .timeout(config.timeout)
                    .build()?,
            ),
            None => None,
        };
        Ok(Self { config, http })
    }

    /// A client that always reports insights as unavailable.
    #[cfg(test)]
    pub fn disabled() -> Self {
        Self {
            config: InsightConfig::default(),
            http: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.http.is_some()
    }

    /// Asks the model for a short narrative about `summary`.
    pub async fn request_insight(&self, summary: &TrendSummary) -> String {
        let (Some(http), Some(api_key)) = (&self.http, &self.config.api_key) else {
            return UNAVAILABLE_MESSAGE.to_string();
        };

        match self.complete(http, api_key, &build_prompt(summary)).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Insight request failed: {}", e);
                format!(
                    "AI analysis unavailable: {}. Please check your OpenAI API configuration.",
                    e
                )
            }
        }
    }

    async fn complete(
        &self,
        http: &Client,
        api_key: &str,
        prompt: &str,
    ) -> Result<String, FlightTrendsError> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        debug!("Requesting insight from {} with model {}", url, self.config.model);
        let response: ChatResponse = http
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| FlightTrendsError::InvalidApiResponse("no completion returned".into()))
    }
}

fn ranked(items: &[(String, usize)], take: usize) -> String {
    items
        .iter()
        .take(take)
        .map(|(label, count)| format!("{} ({})", label, count))
        .join(", ")
}

/// Builds the model prompt from the headline numbers, the top five routes,
/// and the top three airlines.
pub fn build_prompt(summary: &TrendSummary) -> String {
    format!(
        "Analyze this airline booking market data and provide key insights:\n\
         \n\
         Data Summary:\n\
         - Total flights analyzed: {}\n\
         - Average price: ${}\n\
         - Price range: {}\n\
         - Top routes: {}\n\
         - Airlines: {}\n\
         \n\
         Please provide:\n\
         1. Market demand trends\n\
         2. Pricing insights\n\
         3. Route popularity analysis\n\
         4. Recommendations for hostel businesses\n\
         \n\
         Keep the response concise and actionable.",
        summary.total_flights,
        summary.avg_price,
        summary.price_range,
        ranked(&summary.popular_routes, 5),
        ranked(&summary.airline_share, 3),
    )
}
