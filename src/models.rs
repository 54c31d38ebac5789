//! Data models for flight records and trend summaries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Carriers that appear in the simulated data, in rotation order.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Airline {
    Jetstar,
    #[serde(rename = "Virgin Australia")]
    VirginAustralia,
    Qantas,
    Tigerair,
}

impl Airline {
    pub const ALL: [Airline; 4] = [
        Airline::Jetstar,
        Airline::VirginAustralia,
        Airline::Qantas,
        Airline::Tigerair,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Airline::Jetstar => "Jetstar",
            Airline::VirginAustralia => "Virgin Australia",
            Airline::Qantas => "Qantas",
            Airline::Tigerair => "Tigerair",
        }
    }
}

impl fmt::Display for Airline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One simulated flight offer.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FlightRecord {
    pub origin: String,
    pub destination: String,
    pub price: i64,
    /// Upper bound of the fare range, scaled by the same multiplier as `price`.
    pub max_price: i64,
    pub date: NaiveDate,
    pub airline: Airline,
    /// Display label such as "3h 45m".
    pub duration: String,
}

/// Average price for a single calendar day.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyPrice {
    pub date_str: String,
    pub price: f64,
}

/// Number of flights on a single calendar day.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyDemand {
    pub date_str: String,
    pub flight_count: usize,
}

/// Aggregate statistics computed from a list of flight records.
///
/// Route lists hold `("Origin → Destination", value)` pairs and serialize
/// as two-element JSON arrays, which is what the dashboard charts read.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TrendSummary {
    /// Flight count per route, busiest first, at most 10.
    pub popular_routes: Vec<(String, usize)>,
    /// Mean price per route, most expensive first, at most 10.
    pub price_trends: Vec<(String, f64)>,
    /// Mean price per day, oldest first.
    pub daily_prices: Vec<DailyPrice>,
    /// Flight count per airline, largest first.
    pub airline_share: Vec<(String, usize)>,
    /// Flight count per day, oldest first.
    pub daily_demand: Vec<DailyDemand>,
    pub total_flights: usize,
    pub avg_price: f64,
    pub price_range: String,
}

impl TrendSummary {
    /// Summary of an empty flight list.
    pub fn empty() -> Self {
        Self {
            popular_routes: Vec::new(),
            price_trends: Vec::new(),
            daily_prices: Vec::new(),
            airline_share: Vec::new(),
            daily_demand: Vec::new(),
            total_flights: 0,
            avg_price: 0.0,
            price_range: "$0 - $0".to_string(),
        }
    }
}

/// Body returned by `POST /api/analyze`.
#[derive(Debug, Serialize, Clone)]
pub struct AnalysisResponse {
    #[serde(flatten)]
    pub summary: TrendSummary,
    pub ai_insights: String,
}
