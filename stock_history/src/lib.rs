#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod history;
pub mod io;
pub mod models;
pub mod providers;

pub use errors::Error;
pub use history::fetch_price_history;
