//! Yahoo Finance v8 chart endpoint (`/v8/finance/chart/{symbol}`).
//!
//! No API key is needed, but the endpoint rejects clients without a
//! browser-like `User-Agent`, so one is always sent.

pub mod params;
pub mod provider;
pub mod response;

pub use params::ChartQuery;
pub use provider::YahooChartProvider;
