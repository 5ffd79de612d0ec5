//! Test utilities for deporder
//!
//! Helpers shared by unit tests and the integration suites: one-time logging
//! setup and manifest fixtures.
//!
//! # Example
//!
//! ```rust,no_run
//! use deporder::test_utils::{SAMPLE_MANIFEST, init_test_logging, write_manifest};
//!
//! init_test_logging(None);
//! let temp = tempfile::tempdir().unwrap();
//! let path = write_manifest(temp.path(), SAMPLE_MANIFEST);
//! assert!(path.exists());
//! ```

pub mod fixtures;

pub use fixtures::{SAMPLE_MANIFEST, ManifestFixture, sample_registry, write_manifest};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` if given, otherwise
/// `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=deporder=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
