use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use chrono_tz::Tz;
use indexmap::IndexMap;
use serde::Deserialize;
use snafu::OptionExt;
use tracing::warn;

use crate::{
    models::{bar::Bar, bar_series::BarSeries, timeframe::TimeFrame},
    providers::{InternalSnafu, MissingFieldSnafu, ProviderError},
};

#[derive(Deserialize, Debug)]
pub struct ChartEnvelope {
    pub chart: Chart,
}

#[derive(Deserialize, Debug)]
pub struct Chart {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartError>,
}

#[derive(Deserialize, Debug, PartialEq, Eq)]
pub struct ChartError {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl std::fmt::Display for ChartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{}: {}", self.code, description),
            None => f.write_str(&self.code),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct ChartResult {
    pub meta: ChartMeta,
    /// Absent when the symbol has no bars in the window.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    #[serde(default)]
    pub indicators: Indicators,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: String,
    #[serde(default)]
    pub exchange_timezone_name: Option<String>,
    /// Seconds east of UTC.
    #[serde(default)]
    pub gmtoffset: i32,
}

#[derive(Deserialize, Debug, Default)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
}

/// Column-oriented OHLCV; index `i` of every column belongs to `timestamp[i]`.
#[derive(Deserialize, Debug, Default)]
pub struct Quote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

impl Quote {
    fn row(&self, i: usize) -> [Option<f64>; 5] {
        let at = |column: &[Option<f64>]| column.get(i).copied().flatten();
        [
            at(&self.open),
            at(&self.high),
            at(&self.low),
            at(&self.close),
            at(&self.volume),
        ]
    }
}

/// The zone used to turn a bar's instant into its trading date.
#[derive(Debug, Clone, Copy)]
enum ExchangeZone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl ExchangeZone {
    fn from_meta(meta: &ChartMeta) -> Self {
        if let Some(tz) = meta
            .exchange_timezone_name
            .as_deref()
            .and_then(|name| name.parse::<Tz>().ok())
        {
            return Self::Named(tz);
        }
        Self::Fixed(FixedOffset::east_opt(meta.gmtoffset).unwrap_or_else(|| Utc.fix()))
    }

    fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            Self::Named(tz) => instant.with_timezone(tz).date_naive(),
            Self::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }
}

impl ChartResult {
    /// Converts the column-oriented response into a [`BarSeries`].
    ///
    /// Rows with no data at all are dropped. Rows missing only some fields
    /// are an error. Rows that land on an already seen trading date replace
    /// the earlier values in place.
    pub fn into_bar_series(self, timeframe: TimeFrame) -> Result<BarSeries, ProviderError> {
        let zone = ExchangeZone::from_meta(&self.meta);
        let symbol = self.meta.symbol;

        if self.timestamp.is_empty() {
            return Ok(BarSeries::empty(symbol, timeframe));
        }

        let quote = self
            .indicators
            .quote
            .into_iter()
            .next()
            .context(InternalSnafu {
                message: "response has timestamps but no quote indicators",
            })?;

        let mut by_date: IndexMap<NaiveDate, Bar> = IndexMap::with_capacity(self.timestamp.len());

        for (i, &ts) in self.timestamp.iter().enumerate() {
            let timestamp = DateTime::from_timestamp(ts, 0).context(InternalSnafu {
                message: format!("timestamp {ts} is out of range"),
            })?;
            let date = zone.local_date(timestamp);

            let row = quote.row(i);
            if row.iter().all(Option::is_none) {
                warn!(%symbol, %date, "dropping row with no OHLCV data");
                continue;
            }

            let [open, high, low, close, volume] = row;
            let require = |field: &'static str, value: Option<f64>| {
                value.context(MissingFieldSnafu { date, field })
            };
            let bar = Bar {
                timestamp,
                date,
                open: require("open", open)?,
                high: require("high", high)?,
                low: require("low", low)?,
                close: require("close", close)?,
                volume: require("volume", volume)?,
            };

            if let Some(replaced) = by_date.insert(date, bar) {
                warn!(%symbol, %date, replaced = %replaced.timestamp, "collapsed duplicate trading date");
            }
        }

        Ok(BarSeries {
            symbol,
            timeframe,
            bars: by_date.into_values().collect(),
        })
    }
}
