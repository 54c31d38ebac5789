//! Simulated flight data.
//!
//! There is no live flight feed behind this service. Every request builds a
//! fresh batch of synthetic offers from a fixed route table, spread over the
//! requested lookback window.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::error::FlightTrendsError;
use crate::models::{Airline, FlightRecord};

/// Number of records generated before filtering.
pub const SAMPLE_SIZE: usize = 200;

pub const DEFAULT_DAYS_BACK: i64 = 30;
/// Upper bound on the lookback window; keeps `today - days_back` far inside
/// chrono's representable date range.
pub const MAX_DAYS_BACK: i64 = 1_000_000;

/// Cities served to the dashboard's select lists by `GET /api/cities`.
pub const CITIES: [&str; 8] = [
    "Sydney",
    "Melbourne",
    "Brisbane",
    "Perth",
    "Adelaide",
    "Darwin",
    "Hobart",
    "Canberra",
];

/// (origin, destination, base price, base max price)
const ROUTES: [(&str, &str, i64, i64); 10] = [
    ("Sydney", "Melbourne", 250, 400),
    ("Melbourne", "Brisbane", 180, 350),
    ("Brisbane", "Perth", 300, 500),
    ("Sydney", "Brisbane", 200, 380),
    ("Melbourne", "Perth", 280, 480),
    ("Adelaide", "Sydney", 220, 420),
    ("Perth", "Sydney", 350, 550),
    ("Brisbane", "Adelaide", 200, 380),
    ("Sydney", "Perth", 400, 600),
    ("Melbourne", "Adelaide", 150, 280),
];

const WEEKEND_MULTIPLIER: f64 = 1.3;
const PEAK_DAY_MULTIPLIER: f64 = 1.2;

/// Validated route filter and lookback window for one analysis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightQuery {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub days_back: u32,
}

impl FlightQuery {
    /// Builds a query, rejecting lookback windows outside `1..=MAX_DAYS_BACK`.
    pub fn new(
        origin: Option<String>,
        destination: Option<String>,
        days_back: Option<i64>,
    ) -> Result<Self, FlightTrendsError> {
        let days_back = days_back.unwrap_or(DEFAULT_DAYS_BACK);
        if !(1..=MAX_DAYS_BACK).contains(&days_back) {
            return Err(FlightTrendsError::InvalidRequest(format!(
                "days_back must be between 1 and {}",
                MAX_DAYS_BACK
            )));
        }

        Ok(Self {
            origin,
            destination,
            days_back: days_back as u32,
        })
    }

    fn matches(&self, flight: &FlightRecord) -> bool {
        let origin_ok = self
            .origin
            .as_ref()
            .is_none_or(|o| flight.origin.to_lowercase() == o.to_lowercase());
        let destination_ok = self
            .destination
            .as_ref()
            .is_none_or(|d| flight.destination.to_lowercase() == d.to_lowercase());
        origin_ok && destination_ok
    }
}

/// Fare multiplier for a travel date: weekends cost 30% more and the 1st
/// and 15th of the month another 20% on top.
fn price_multiplier(date: NaiveDate) -> f64 {
    let mut multiplier = 1.0;
    if matches!(date.weekday(), Weekday::Fri | Weekday::Sat | Weekday::Sun) {
        multiplier = WEEKEND_MULTIPLIER;
    }
    if matches!(date.day(), 1 | 15) {
        multiplier *= PEAK_DAY_MULTIPLIER;
    }
    multiplier
}

/// Generates `SAMPLE_SIZE` synthetic flights ending at `today` and keeps the
/// ones matching the query's route filter.
///
/// Dates start `days_back` days before `today` and cycle with period
/// `days_back`, so short windows repeat dates. Filters compare city names
/// case-insensitively; a filter that matches nothing yields an empty list.
pub fn generate_sample_flights(query: &FlightQuery, today: NaiveDate) -> Vec<FlightRecord> {
    let days_back = i64::from(query.days_back.max(1));
    let start = today - Duration::days(days_back);

    (0..SAMPLE_SIZE)
        .map(|i| {
            let (origin, destination, base_price, base_max) = ROUTES[i % ROUTES.len()];
            let date = start + Duration::days(i as i64 % days_back);
            let multiplier = price_multiplier(date);

            FlightRecord {
                origin: origin.to_string(),
                destination: destination.to_string(),
                price: (base_price as f64 * multiplier) as i64,
                max_price: (base_max as f64 * multiplier) as i64,
                date,
                airline: Airline::ALL[i % Airline::ALL.len()],
                duration: format!("{}h {}m", 2 + i % 4, 30 + i % 30),
            }
        })
        .filter(|flight| query.matches(flight))
        .collect()
}
