//! deporder CLI entry point
//!
//! Parses arguments, sets up logging, runs the command and renders any error
//! with its suggestion before exiting with status 1.

use anyhow::Result;
use clap::Parser;
use deporder::cli::{Cli, CliConfig};
use deporder::core::user_friendly_error;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `--verbose` / `--quiet` take precedence over `RUST_LOG`; with neither,
/// `info` is used. Logs go to stderr so command output stays clean.
fn init_logging(config: &CliConfig) {
    let filter = match &config.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let config = cli.build_config();
    init_logging(&config);

    match cli.execute_with_config(config) {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
