//! The flat record printed for each trading day.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::bar::Bar;

/// Format used for [`PriceBar::date`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One trading day as it appears in the JSON output.
///
/// Field order is the serialized key order: `date, open, high, low, close, volume`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// `YYYY-MM-DD`, exchange-local.
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// A bar that cannot be represented as a [`PriceBar`].
#[derive(Debug, Error, PartialEq)]
#[error("Cannot convert bar for {date}: {field} is {value}")]
pub struct ConversionError {
    pub date: String,
    pub field: &'static str,
    pub value: f64,
}

impl TryFrom<&Bar> for PriceBar {
    type Error = ConversionError;

    fn try_from(bar: &Bar) -> Result<Self, Self::Error> {
        let date = bar.date.format(DATE_FORMAT).to_string();

        for (field, value) in [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("close", bar.close),
        ] {
            if !value.is_finite() {
                return Err(ConversionError { date, field, value });
            }
        }

        // Integer coercion truncates toward zero.
        if !bar.volume.is_finite() || bar.volume < 0.0 {
            return Err(ConversionError {
                date,
                field: "volume",
                value: bar.volume,
            });
        }

        Ok(Self {
            date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume.trunc() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;

    fn bar(volume: f64) -> Bar {
        Bar {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 187.15,
            high: 188.44,
            low: 183.89,
            close: 185.64,
            volume,
        }
    }

    #[test]
    fn converts_date_and_fields() {
        let record = PriceBar::try_from(&bar(82_488_700.0)).unwrap();
        assert_eq!(record.date, "2024-01-02");
        assert_eq!(record.open, 187.15);
        assert_eq!(record.high, 188.44);
        assert_eq!(record.low, 183.89);
        assert_eq!(record.close, 185.64);
        assert_eq!(record.volume, 82_488_700);
    }

    #[test]
    fn volume_is_truncated() {
        assert_eq!(PriceBar::try_from(&bar(1234.99)).unwrap().volume, 1234);
        assert_eq!(PriceBar::try_from(&bar(0.0)).unwrap().volume, 0);
    }

    #[test]
    fn single_digit_months_are_zero_padded() {
        let mut b = bar(1.0);
        b.date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(PriceBar::try_from(&b).unwrap().date, "2025-03-07");
    }

    #[test]
    fn non_finite_price_is_rejected() {
        let mut b = bar(1.0);
        b.close = f64::NAN;
        let err = PriceBar::try_from(&b).unwrap_err();
        assert_eq!(err.field, "close");
        assert_eq!(err.date, "2024-01-02");
    }

    #[test]
    fn negative_volume_is_rejected() {
        let err = PriceBar::try_from(&bar(-5.0)).unwrap_err();
        assert_eq!(err.field, "volume");
        assert!(err.to_string().contains("volume is -5"));
    }

    #[test]
    fn serializes_keys_in_declared_order() {
        let record = PriceBar::try_from(&bar(100.0)).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"date":"2024-01-02","open":187.15,"high":188.44,"low":183.89,"close":185.64,"volume":100}"#
        );
    }
}
