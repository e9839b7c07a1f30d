pub mod commands;

use tracing_subscriber::EnvFilter;

/// Exit status when no ticker was given.
pub const EXIT_USAGE: u8 = 1;
/// Exit status for any failure after argument parsing.
pub const EXIT_FAILURE: u8 = 2;

/// Logs go to stderr so stdout only ever carries JSON.
///
/// Filtered by `RUST_LOG`, defaulting to `warn`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
