use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::models::timeframe::TimeFrame;

/// A closed time range `[start, end]` that bars are requested for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookbackWindow {
    /// Start of the requested range (inclusive, UTC).
    pub start: DateTime<Utc>,
    /// End of the requested range (UTC). Usually the moment of invocation.
    pub end: DateTime<Utc>,
}

impl LookbackWindow {
    /// The window covering `months` calendar months up to `end`.
    ///
    /// Month arithmetic clamps to the last day of shorter months,
    /// so Aug 31 minus six months is Feb 28 (or 29).
    pub fn trailing_months(months: u32, end: DateTime<Utc>) -> Self {
        let start = end
            .checked_sub_months(Months::new(months))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { start, end }
    }
}

/// Parameters for requesting time-series bar data from a market data provider.
///
/// Vendor-agnostic: each [`DataProvider`](crate::providers::DataProvider)
/// translates it into its own query format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarsRequestParams {
    /// The symbol to request, exactly as the provider expects it (e.g. `"AAPL"`, `"TCS.NS"`).
    pub symbol: String,

    /// The time interval for each bar.
    ///
    /// **Validation of allowed values is performed by each data provider
    /// implementation, according to their own API rules.**
    pub timeframe: TimeFrame,

    /// The time range to cover.
    pub window: LookbackWindow,
}
