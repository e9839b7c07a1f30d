use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Print six months of daily OHLCV bars for a ticker as a JSON array"
)]
pub struct Cli {
    /// Path to an optional config file (TOML, see `[provider]` settings)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Ticker symbol (e.g. "AAPL"). When missing, `[]` is printed and the exit status is 1
    pub ticker: Option<String>,

    /// Anything after the ticker is accepted and ignored.
    #[arg(hide = true, num_args = 0..)]
    pub rest: Vec<String>,
}

impl Cli {
    /// The ticker, if one was supplied and is not blank.
    pub fn ticker(&self) -> Option<&str> {
        self.ticker.as_deref().filter(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_is_optional() {
        let cli = Cli::try_parse_from(["fetch-stock-data"]).unwrap();
        assert_eq!(cli.ticker(), None);
        assert!(cli.config.is_none());
    }

    #[test]
    fn blank_ticker_counts_as_missing() {
        let cli = Cli::try_parse_from(["fetch-stock-data", "  "]).unwrap();
        assert_eq!(cli.ticker(), None);
    }

    #[test]
    fn parses_ticker_and_config() {
        let cli =
            Cli::try_parse_from(["fetch-stock-data", "--config", "fetch.toml", "MSFT"]).unwrap();
        assert_eq!(cli.ticker(), Some("MSFT"));
        assert_eq!(cli.config, Some(PathBuf::from("fetch.toml")));
    }

    #[test]
    fn extra_positionals_are_ignored() {
        let cli = Cli::try_parse_from(["fetch-stock-data", "AAPL", "MSFT", "extra"]).unwrap();
        assert_eq!(cli.ticker(), Some("AAPL"));
        assert_eq!(cli.rest, ["MSFT", "extra"]);
    }
}
