//! Helpers shared by the CLI commands.

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::path::Path;

use crate::config::ResolverConfig;
use crate::declaration::DeclarationRegistry;
use crate::manifest::Manifest;

/// Output format of the `order` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One kind per line, numbered
    #[default]
    Text,
    /// A JSON document
    Json,
}

/// A loaded manifest with its registry and effective resolver configuration.
#[derive(Debug)]
pub struct ManifestContext {
    pub manifest: Manifest,
    pub registry: DeclarationRegistry,
    pub config: ResolverConfig,
}

impl ManifestContext {
    /// Load `manifest_path`, build its registry and apply the optional
    /// standalone configuration file on top of its `[resolver]` table.
    ///
    /// # Errors
    ///
    /// Fails if either file cannot be read or parsed, or if the manifest's
    /// declarations are malformed.
    pub fn load(manifest_path: &Path, config_path: Option<&Path>) -> Result<Self> {
        let manifest = Manifest::load(manifest_path)?;
        let registry = manifest
            .registry()
            .with_context(|| format!("Invalid declarations in {}", manifest_path.display()))?;

        let config = match config_path {
            Some(path) => manifest.resolver.merge_file(path)?,
            None => manifest.resolver,
        };
        tracing::debug!("Effective resolver config: {:?}", config);

        Ok(Self {
            manifest,
            registry,
            config,
        })
    }
}

/// Map `--allow-duplicates` to a `check_duplicates` override.
pub const fn duplicate_check(allow_duplicates: bool) -> Option<bool> {
    if allow_duplicates { Some(false) } else { None }
}

/// Map the `--strict` / `--lenient` flag pair to an override.
pub const fn strictness(strict: bool, lenient: bool) -> Option<bool> {
    if strict {
        Some(true)
    } else if lenient {
        Some(false)
    } else {
        None
    }
}
