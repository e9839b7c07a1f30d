//! The fetch-and-reshape pipeline behind the CLI.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    errors::Error,
    models::{
        bar_series::BarSeries,
        price_bar::{ConversionError, PriceBar},
        request_params::{BarsRequestParams, LookbackWindow},
        timeframe::TimeFrame,
    },
    providers::DataProvider,
};

/// Length of the history window. Not configurable.
pub const LOOKBACK_MONTHS: u32 = 6;

/// Daily bars for `symbol` covering the six months up to `now`, as output records.
///
/// Records keep the provider's (chronological) order. Any provider or
/// conversion failure aborts the whole fetch; there is no partial result.
pub async fn fetch_price_history<P>(
    provider: &P,
    symbol: &str,
    now: DateTime<Utc>,
) -> Result<Vec<PriceBar>, Error>
where
    P: DataProvider + Sync + ?Sized,
{
    let params = BarsRequestParams {
        symbol: symbol.to_string(),
        timeframe: TimeFrame::day(),
        window: LookbackWindow::trailing_months(LOOKBACK_MONTHS, now),
    };
    debug!(symbol, start = %params.window.start, end = %params.window.end, "fetching price history");

    let series = provider.fetch_bars(params).await?;
    Ok(to_price_bars(&series)?)
}

pub fn to_price_bars(series: &BarSeries) -> Result<Vec<PriceBar>, ConversionError> {
    series.bars.iter().map(PriceBar::try_from).collect()
}
