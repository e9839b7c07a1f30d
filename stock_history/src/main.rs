use std::{io, process::ExitCode};

use chrono::Utc;
use clap::Parser;
use stock_history::{
    Error,
    cli::{EXIT_FAILURE, EXIT_USAGE, commands::Cli, init_tracing},
    config::FetcherConfig,
    fetch_price_history,
    io::sink::{DataSink, JsonLineSink},
    providers::yahoo_chart::YahooChartProvider,
};
use tracing::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let Some(ticker) = cli.ticker() else {
        println!("[]");
        return ExitCode::from(EXIT_USAGE);
    };

    match run(&cli, ticker).await {
        Ok(count) => {
            debug!(count, "wrote price history");
            ExitCode::SUCCESS
        }
        Err(err) => {
            // Each layer's message already embeds its cause.
            eprintln!("ERROR: {err}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

async fn run(cli: &Cli, ticker: &str) -> Result<usize, Error> {
    let config = FetcherConfig::load(cli.config.as_deref())?;
    let provider = YahooChartProvider::new(&config.provider)?;
    let symbol = config.provider.qualified_symbol(ticker);

    let records = fetch_price_history(&provider, &symbol, Utc::now()).await?;

    let sink = JsonLineSink::new(io::stdout());
    Ok(sink.write(&records).await?)
}
