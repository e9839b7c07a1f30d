//! Runtime configuration.
//!
//! Values are resolved in three layers: built-in defaults, then an optional
//! TOML file, then environment variables. A config file looks like:
//!
//! ```toml
//! [provider]
//! base_url = "https://query2.finance.yahoo.com"
//! symbol_suffix = ".NS"
//! request_timeout_secs = 30
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use shared_utils::env::get_optional_env_var;
use thiserror::Error;

pub const BASE_URL_ENV: &str = "STOCK_HISTORY_BASE_URL";
pub const USER_AGENT_ENV: &str = "STOCK_HISTORY_USER_AGENT";
pub const SYMBOL_SUFFIX_ENV: &str = "STOCK_HISTORY_SYMBOL_SUFFIX";

pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetcherConfig {
    pub provider: ProviderSettings,
}

/// Settings for the market data provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderSettings {
    /// Scheme and host of the chart API, optionally with a path prefix.
    pub base_url: String,
    pub user_agent: String,
    /// Exchange suffix appended to every ticker (e.g. `.NS` for NSE listings).
    pub symbol_suffix: Option<String>,
    /// No timeout unless set.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            symbol_suffix: None,
            request_timeout_secs: None,
        }
    }
}

impl ProviderSettings {
    /// The symbol to send to the provider for a user-supplied ticker.
    ///
    /// The suffix is not added twice, so `TCS.NS` and `TCS` both become `TCS.NS`.
    pub fn qualified_symbol(&self, ticker: &str) -> String {
        let ticker = ticker.trim();
        match self.symbol_suffix.as_deref() {
            Some(suffix) if !ticker.to_ascii_uppercase().ends_with(&suffix.to_ascii_uppercase()) => {
                format!("{ticker}{suffix}")
            }
            _ => ticker.to_string(),
        }
    }
}

impl FetcherConfig {
    /// Defaults, overlaid with `path` (if given) and then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(base_url) = get_optional_env_var(BASE_URL_ENV) {
            self.provider.base_url = base_url;
        }
        if let Some(user_agent) = get_optional_env_var(USER_AGENT_ENV) {
            self.provider.user_agent = user_agent;
        }
        if let Some(suffix) = get_optional_env_var(SYMBOL_SUFFIX_ENV) {
            self.provider.symbol_suffix = Some(suffix);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("provider.base_url must not be empty".into()));
        }
        if self.provider.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("provider.user_agent must not be empty".into()));
        }
        if self.provider.request_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "provider.request_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
