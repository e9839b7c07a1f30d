use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url, header};
use snafu::{OptionExt, ResultExt};
use tracing::debug;

use crate::{
    config::ProviderSettings,
    models::{bar_series::BarSeries, request_params::BarsRequestParams},
    providers::{
        ApiSnafu, ClientBuildSnafu, DataProvider, DecodeSnafu, InternalSnafu, InvalidBaseUrlSnafu,
        InvalidUserAgentSnafu, ProviderError, ProviderInitError, ReqwestSnafu,
        yahoo_chart::{params::construct_params, response::ChartEnvelope},
    },
};

const CHART_PATH: [&str; 3] = ["v8", "finance", "chart"];

pub struct YahooChartProvider {
    client: Client,
    base_url: Url,
}

impl YahooChartProvider {
    /// Creates a new provider from the `[provider]` settings.
    ///
    /// The user agent is installed as a default header. A request timeout is
    /// only set when `request_timeout_secs` is configured.
    pub fn new(settings: &ProviderSettings) -> Result<Self, ProviderInitError> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| {
            InvalidBaseUrlSnafu {
                url: settings.base_url.clone(),
                message: e.to_string(),
            }
            .build()
        })?;
        if base_url.cannot_be_a_base() {
            return InvalidBaseUrlSnafu {
                url: settings.base_url.clone(),
                message: "URL cannot have path segments",
            }
            .fail();
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&settings.user_agent).context(InvalidUserAgentSnafu)?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = Client::builder().default_headers(headers);
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context(ClientBuildSnafu)?;

        Ok(Self { client, base_url })
    }

    /// `{base_url}/v8/finance/chart/{symbol}`, with the symbol percent-encoded
    /// as a single path segment (`^GSPC`, `BRK/B`).
    pub fn chart_url(&self, symbol: &str) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .ok()
            .context(InternalSnafu {
                message: format!("base URL {} cannot have path segments", self.base_url),
            })?
            .pop_if_empty()
            .extend(CHART_PATH)
            .push(symbol);
        Ok(url)
    }
}

#[async_trait]
impl DataProvider for YahooChartProvider {
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<BarSeries, ProviderError> {
        let query = construct_params(&params)?;
        let url = self.chart_url(&params.symbol)?;
        debug!(%url, period1 = query.period1, period2 = query.period2, interval = query.interval, "requesting chart");

        let response = self
            .client
            .get(url)
            .query(&query)
            .send()
            .await
            .context(ReqwestSnafu)?;
        let status = response.status();
        let body = response.text().await.context(ReqwestSnafu)?;

        // Yahoo reports unknown symbols as a 404 whose body still carries a
        // chart envelope, so the body is decoded before the status is checked.
        let envelope = match serde_json::from_str::<ChartEnvelope>(&body) {
            Ok(envelope) => envelope,
            Err(source) if status.is_success() => return Err(source).context(DecodeSnafu),
            Err(_) => {
                return ApiSnafu {
                    message: format!("HTTP {status}: {}", body.trim()),
                }
                .fail();
            }
        };

        if let Some(error) = envelope.chart.error {
            return ApiSnafu {
                message: error.to_string(),
            }
            .fail();
        }
        if !status.is_success() {
            return ApiSnafu {
                message: format!("HTTP {status}"),
            }
            .fail();
        }

        let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
            debug!(symbol = %params.symbol, "chart response had no result");
            return Ok(BarSeries::empty(params.symbol, params.timeframe));
        };

        let series = result.into_bar_series(params.timeframe)?;
        debug!(symbol = %series.symbol, bars = series.bars.len(), "decoded chart");
        Ok(series)
    }
}
