use serde::Serialize;
use snafu::ensure;

use crate::{
    models::{
        request_params::BarsRequestParams,
        timeframe::{TimeFrame, TimeFrameUnit},
    },
    providers::{ProviderError, ValidationSnafu},
};

/// Events requested alongside the bars. Only their effect on the
/// adjusted series matters here, the event payloads are ignored.
const EVENTS: &str = "div|split";

/// Query string for a chart request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartQuery {
    /// Window start, Unix seconds.
    pub period1: i64,
    /// Window end, Unix seconds.
    pub period2: i64,
    pub interval: &'static str,
    pub include_pre_post: bool,
    pub events: &'static str,
}

/// Maps a [`TimeFrame`] onto one of the interval codes the chart endpoint accepts.
pub fn validate_timeframe(timeframe: &TimeFrame) -> Result<&'static str, ProviderError> {
    let interval = match (timeframe.unit, timeframe.amount) {
        (TimeFrameUnit::Minute, 1) => "1m",
        (TimeFrameUnit::Minute, 2) => "2m",
        (TimeFrameUnit::Minute, 5) => "5m",
        (TimeFrameUnit::Minute, 15) => "15m",
        (TimeFrameUnit::Minute, 30) => "30m",
        (TimeFrameUnit::Hour, 1) => "1h",
        (TimeFrameUnit::Day, 1) => "1d",
        (TimeFrameUnit::Week, 1) => "1wk",
        (TimeFrameUnit::Month, 1) => "1mo",
        (TimeFrameUnit::Month, 3) => "3mo",
        _ => {
            return ValidationSnafu {
                message: format!("timeframe {timeframe} is not served by the chart endpoint"),
            }
            .fail();
        }
    };
    Ok(interval)
}

pub fn construct_params(params: &BarsRequestParams) -> Result<ChartQuery, ProviderError> {
    let interval = validate_timeframe(&params.timeframe)?;
    ensure!(
        params.window.start < params.window.end,
        ValidationSnafu {
            message: format!(
                "window start {} is not before end {}",
                params.window.start, params.window.end
            ),
        }
    );

    Ok(ChartQuery {
        period1: params.window.start.timestamp(),
        period2: params.window.end.timestamp(),
        interval,
        include_pre_post: false,
        events: EVENTS,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::models::request_params::LookbackWindow;

    fn params(timeframe: TimeFrame) -> BarsRequestParams {
        BarsRequestParams {
            symbol: "AAPL".into(),
            timeframe,
            window: LookbackWindow::trailing_months(
                6,
                Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap(),
            ),
        }
    }

    #[test]
    fn daily_request_uses_unix_window() {
        let query = construct_params(&params(TimeFrame::day())).unwrap();
        assert_eq!(
            query,
            ChartQuery {
                period1: 1_776_600_000,
                period2: 1_792_411_200,
                interval: "1d",
                include_pre_post: false,
                events: "div|split",
            }
        );
    }

    #[test]
    fn query_serializes_with_camel_case_keys() {
        let query = construct_params(&params(TimeFrame::day())).unwrap();
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value["includePrePost"], false);
        assert_eq!(value["period1"], 1_776_600_000_i64);
        assert_eq!(value["interval"], "1d");
    }

    #[test]
    fn unsupported_timeframe_is_rejected() {
        let tf = TimeFrame::new(3, TimeFrameUnit::Hour).unwrap();
        let err = construct_params(&params(tf)).unwrap_err();
        assert!(matches!(err, ProviderError::Validation { .. }));
        assert!(err.to_string().contains("3Hour"));
    }

    #[test]
    fn empty_window_is_rejected() {
        let mut p = params(TimeFrame::day());
        p.window.start = p.window.end;
        assert!(matches!(
            construct_params(&p),
            Err(ProviderError::Validation { .. })
        ));
    }
}
