use thiserror::Error;

use crate::{
    config::ConfigError,
    io::sink::SinkError,
    models::price_bar::ConversionError,
    providers::{ProviderError, ProviderInitError},
};

/// The unified error type for the `stock_history` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// An error originating from the data provider (network, API, response shape).
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The provider could not be constructed from the configuration.
    #[error("Provider setup error: {0}")]
    ProviderInit(#[from] ProviderInitError),

    /// A bar that could not be turned into an output record.
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// An error originating from the output sink.
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// An error related to configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
