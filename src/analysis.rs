//! Trend aggregation over flight records using Polars.

use polars::prelude::*;

use crate::models::{DailyDemand, DailyPrice, FlightRecord, TrendSummary};

const TOP_ROUTES: IdxSize = 10;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Two decimal places, ties to even.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

fn route_label(origin: &str, destination: &str) -> String {
    format!("{} → {}", origin, destination)
}

/// Descending and stable, so ties keep first-seen order.
fn descending() -> SortMultipleOptions {
    SortMultipleOptions::default()
        .with_order_descending(true)
        .with_maintain_order(true)
}

fn flights_frame(flights: &[FlightRecord]) -> PolarsResult<DataFrame> {
    let origins: Vec<&str> = flights.iter().map(|f| f.origin.as_str()).collect();
    let destinations: Vec<&str> = flights.iter().map(|f| f.destination.as_str()).collect();
    let prices: Vec<i64> = flights.iter().map(|f| f.price).collect();
    // ISO dates sort chronologically as strings.
    let dates: Vec<String> = flights
        .iter()
        .map(|f| f.date.format(DATE_FORMAT).to_string())
        .collect();
    let airlines: Vec<&str> = flights.iter().map(|f| f.airline.as_str()).collect();

    df!(
        "origin" => origins,
        "destination" => destinations,
        "price" => prices,
        "date" => dates,
        "airline" => airlines
    )
}

fn str_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<String>> {
    Ok(df
        .column(name)?
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect())
}

fn count_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<usize>> {
    let counts = df.column(name)?.cast(&DataType::UInt64)?;
    Ok(counts
        .u64()?
        .into_iter()
        .map(|v| v.unwrap_or_default() as usize)
        .collect())
}

fn float_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<f64>> {
    Ok(df
        .column(name)?
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or_default())
        .collect())
}

fn route_labels(df: &DataFrame) -> PolarsResult<Vec<String>> {
    let origins = str_values(df, "origin")?;
    let destinations = str_values(df, "destination")?;
    Ok(origins
        .iter()
        .zip(destinations.iter())
        .map(|(o, d)| route_label(o, d))
        .collect())
}

/// Computes route, airline, and daily statistics for a list of flights.
///
/// An empty list produces `TrendSummary::empty()` rather than an error.
pub fn analyze_trends(flights: &[FlightRecord]) -> PolarsResult<TrendSummary> {
    if flights.is_empty() {
        return Ok(TrendSummary::empty());
    }

    let df = flights_frame(flights)?;

    let routes = df
        .clone()
        .lazy()
        .group_by_stable([col("origin"), col("destination")])
        .agg([
            len().alias("count"),
            col("price").mean().alias("avg_price"),
        ])
        .collect()?;

    let by_count = routes
        .clone()
        .lazy()
        .sort(["count"], descending())
        .limit(TOP_ROUTES)
        .collect()?;
    let popular_routes = route_labels(&by_count)?
        .into_iter()
        .zip(count_values(&by_count, "count")?)
        .collect();

    let by_price = routes
        .lazy()
        .sort(["avg_price"], descending())
        .limit(TOP_ROUTES)
        .collect()?;
    let price_trends = route_labels(&by_price)?
        .into_iter()
        .zip(float_values(&by_price, "avg_price")?.into_iter().map(round2))
        .collect();

    let daily = df
        .clone()
        .lazy()
        .group_by([col("date")])
        .agg([
            col("price").mean().alias("price"),
            len().alias("flight_count"),
        ])
        .sort(["date"], SortMultipleOptions::default())
        .collect()?;
    let day_labels = str_values(&daily, "date")?;
    let daily_prices = day_labels
        .iter()
        .zip(float_values(&daily, "price")?)
        .map(|(date_str, price)| DailyPrice {
            date_str: date_str.clone(),
            price,
        })
        .collect();
    let daily_demand = day_labels
        .into_iter()
        .zip(count_values(&daily, "flight_count")?)
        .map(|(date_str, flight_count)| DailyDemand {
            date_str,
            flight_count,
        })
        .collect();

    let airlines = df
        .clone()
        .lazy()
        .group_by_stable([col("airline")])
        .agg([len().alias("count")])
        .sort(["count"], descending())
        .collect()?;
    let airline_share = str_values(&airlines, "airline")?
        .into_iter()
        .zip(count_values(&airlines, "count")?)
        .collect();

    let totals = df
        .lazy()
        .select([
            col("price").mean().alias("avg_price"),
            col("price").min().alias("min_price"),
            col("price").max().alias("max_price"),
        ])
        .collect()?;
    let avg_price = float_values(&totals, "avg_price")?
        .first()
        .copied()
        .unwrap_or_default();
    let min_price = totals.column("min_price")?.i64()?.get(0).unwrap_or_default();
    let max_price = totals.column("max_price")?.i64()?.get(0).unwrap_or_default();

    Ok(TrendSummary {
        popular_routes,
        price_trends,
        daily_prices,
        airline_share,
        daily_demand,
        total_flights: flights.len(),
        avg_price: round2(avg_price),
        price_range: format!("${} - ${}", min_price, max_price),
    })
}
