//! Validate the item sets of a manifest.
//!
//! For each set, in name order:
//!
//! 1. No kind appears twice (when `check_duplicates` is enabled)
//! 2. The `main` kind, if named, is one of the items
//! 3. Every declaration of the items is satisfied by the `providers` set, if named
//! 4. The set can be ordered under the effective resolver configuration
//!
//! All sets are checked; the command fails if any of them failed.

use anyhow::{Result, anyhow, bail};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

use super::common::{ManifestContext, duplicate_check, strictness};
use crate::config::ResolverConfig;
use crate::core::{DepError, KindName};
use crate::manifest::SetSpec;
use crate::resolver::Resolver;

#[derive(Args, Debug)]
pub struct CheckCommand {
    /// Path to the manifest
    manifest: PathBuf,

    /// Only check this set
    #[arg(short, long)]
    set: Option<String>,

    /// Fail when a declared dependency is not in the set
    #[arg(long, conflicts_with = "lenient")]
    strict: bool,

    /// Ignore declared dependencies that are not in the set
    #[arg(long)]
    lenient: bool,

    /// Skip the duplicate kind check
    #[arg(long)]
    allow_duplicates: bool,
}

impl CheckCommand {
    pub fn execute(self, config_path: Option<&Path>, quiet: bool) -> Result<()> {
        let ctx = ManifestContext::load(&self.manifest, config_path)?;
        let config = ctx
            .config
            .with_overrides(strictness(self.strict, self.lenient), duplicate_check(self.allow_duplicates));

        let names: Vec<&str> = match &self.set {
            Some(name) => {
                ctx.manifest.set(name)?;
                vec![name.as_str()]
            }
            None => ctx.manifest.sets.keys().map(String::as_str).collect(),
        };

        if names.is_empty() {
            if !quiet {
                println!("{} No sets defined in {}", "⚠".yellow(), self.manifest.display());
            }
            return Ok(());
        }

        let mut failed = Vec::new();
        for name in &names {
            match check_set(&ctx, name, config) {
                Ok(count) => {
                    if !quiet {
                        println!("{} {} ({} items)", "✓".green(), name.bold(), count);
                    }
                }
                Err(e) => {
                    tracing::debug!("Set '{}' failed: {:#}", name, e);
                    if !quiet {
                        println!("{} {}: {}", "✗".red(), name.bold(), e);
                    }
                    failed.push(*name);
                }
            }
        }

        if !failed.is_empty() {
            bail!("{} of {} sets failed validation: {}", failed.len(), names.len(), failed.join(", "));
        }
        Ok(())
    }
}

/// Run every check on one set, returning its item count.
fn check_set(ctx: &ManifestContext, name: &str, config: ResolverConfig) -> Result<usize> {
    let set: &SetSpec = ctx.manifest.set(name)?;
    let items = set.kinds();
    let resolver = Resolver::new(&ctx.registry).with_config(config);

    if let Some(main) = &set.main
        && !items.iter().any(|item| item.as_str() == main)
    {
        return Err(DepError::MissingMainComponent {
            kind: main.clone(),
        }
        .into());
    }

    if let Some(providers) = &set.providers {
        let provider_items: Vec<KindName> = ctx
            .manifest
            .set(providers)
            .map_err(|_| anyhow!("Set '{name}' names unknown providers set '{providers}'"))?
            .kinds();
        resolver.check_satisfied(&items, &provider_items)?;
    }

    // `order` runs the duplicate check first when it is enabled
    let ordered = resolver.order(&items)?;
    Ok(ordered.len())
}
