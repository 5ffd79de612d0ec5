//! Command-line interface for deporder.
//!
//! Every command reads a TOML manifest (see [`crate::manifest`]) and runs the
//! resolver against one or all of its item sets.
//!
//! # Available Commands
//!
//! - `order` - Print the dependency order of one set
//! - `check` - Validate sets: duplicates, main item, providers, ordering
//! - `tree` - Render the dependency tree of a kind
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug output
//! - `--quiet` - Suppress all output except errors
//! - `--config` - TOML file whose `[resolver]` table overrides the manifest's
//!
//! # Example
//!
//! ```bash
//! deporder order scene.toml --set player
//! deporder check scene.toml
//! deporder tree scene.toml Collider
//! ```

mod check;
pub mod common;
mod order;
mod tree;


use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use common::OutputFormat;

/// Settings derived from the global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Tracing filter directive. `None` leaves the choice to `RUST_LOG`.
    pub log_level: Option<String>,

    /// Standalone resolver configuration file.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Parser)]
#[command(
    name = "deporder",
    about = "Order typed items by their declared dependencies",
    version,
    long_about = "deporder reads kinds, dependency declarations and item sets from a TOML manifest, \
                  then orders and validates the sets."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Resolver configuration file overriding the manifest's [resolver] table
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dependency order of a set
    Order(order::OrderCommand),

    /// Validate one or all sets of a manifest
    Check(check::CheckCommand),

    /// Show the dependency tree of a kind
    Tree(tree::TreeCommand),
}

impl Cli {
    /// Run the parsed command.
    ///
    /// # Errors
    ///
    /// Returns the command's error; `main` renders it through
    /// [`user_friendly_error`](crate::core::user_friendly_error).
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config)
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("off".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Whether `--quiet` was given.
    #[must_use]
    pub const fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Run the parsed command with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns the command's error.
    pub fn execute_with_config(self, config: CliConfig) -> Result<()> {
        let config_path = config.config_path.as_deref();
        match self.command {
            Commands::Order(cmd) => cmd.execute(config_path),
            Commands::Check(cmd) => cmd.execute(config_path, self.quiet),
            Commands::Tree(cmd) => cmd.execute(config_path),
        }
    }
}
