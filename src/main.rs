//! weightlog: log daily weight measurements and graph the trend.
//!
//! One-shot CLI: each invocation optionally records an entry, then renders
//! a PNG of the series with a least-squares trend line over the chosen
//! date range.

mod app;
mod cli;
mod data;
mod error;
mod graph;
mod range;
mod trend;

use std::io;
use std::process;

use tracing_subscriber::EnvFilter;

use cli::{AppConfig, Cli};

fn main() {
    // Diagnostics go to stderr so stdout stays clean for user-facing output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let cli = Cli::parse_args();

    if let Err(e) = AppConfig::from_cli(cli).and_then(app::run) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
