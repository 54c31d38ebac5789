//! Flight data sources.
//!
//! `FlightSource` is where a live aviation feed would plug in. Today the only
//! source is the simulated one, and any source failure falls back to it.

use chrono::NaiveDate;
use tracing::warn;

use crate::data::{generate_sample_flights, FlightQuery};
use crate::error::FlightTrendsError;
use crate::models::FlightRecord;

/// Something that can produce flight records for a query.
pub trait FlightSource: Send + Sync {
    fn fetch(
        &self,
        query: &FlightQuery,
        today: NaiveDate,
    ) -> Result<Vec<FlightRecord>, FlightTrendsError>;
}

/// Source backed by the synthetic generator. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct SampleFlights;

impl FlightSource for SampleFlights {
    fn fetch(
        &self,
        query: &FlightQuery,
        today: NaiveDate,
    ) -> Result<Vec<FlightRecord>, FlightTrendsError> {
        Ok(generate_sample_flights(query, today))
    }
}

/// Fetches flights from `source`, substituting simulated data on failure.
pub fn fetch_flight_data(
    source: &dyn FlightSource,
    query: &FlightQuery,
    today: NaiveDate,
) -> Vec<FlightRecord> {
    source.fetch(query, today).unwrap_or_else(|e| {
        warn!("Flight source failed, using simulated data: {}", e);
        generate_sample_flights(query, today)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenSource;

    impl FlightSource for BrokenSource {
        fn fetch(
            &self,
            _query: &FlightQuery,
            _today: NaiveDate,
        ) -> Result<Vec<FlightRecord>, FlightTrendsError> {
            Err(FlightTrendsError::InvalidApiResponse("timed out".into()))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    }

    #[test]
    fn test_sample_source_matches_generator() {
        let query = FlightQuery::new(Some("Perth".into()), None, Some(14)).unwrap();
        let fetched = fetch_flight_data(&SampleFlights, &query, today());
        assert_eq!(fetched, generate_sample_flights(&query, today()));
    }

    #[test]
    fn test_failing_source_falls_back() {
        let query = FlightQuery::new(None, None, None).unwrap();
        let fetched = fetch_flight_data(&BrokenSource, &query, today());
        assert_eq!(fetched.len(), crate::data::SAMPLE_SIZE);
    }
}
