//! Canonical in-memory representation of a time-series bar (OHLCV).
//!
//! This struct is the standard output of every [`DataProvider`](crate::providers::DataProvider)
//! implementation, regardless of which vendor produced it.

use chrono::{DateTime, NaiveDate, Utc};

/// A single daily bar (OHLCV).
///
/// This struct is vendor-agnostic. Prices are kept as the provider sent them;
/// coercion into the printed record happens in [`PriceBar`](crate::models::price_bar::PriceBar).
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// The instant the provider stamped this bar with (UTC).
    pub timestamp: DateTime<Utc>,

    /// The trading date in the exchange's local time zone.
    pub date: NaiveDate,

    /// Opening price.
    pub open: f64,

    /// Highest price during the bar interval.
    pub high: f64,

    /// Lowest price during the bar interval.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Volume traded during the bar interval.
    pub volume: f64,
}
