//! Print the dependency order of one item set.
//!
//! ```bash
//! deporder order scene.toml --set player
//! deporder order scene.toml --set player --lenient --format json
//! ```

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::common::{ManifestContext, OutputFormat, duplicate_check, strictness};
use crate::core::KindName;
use crate::resolver::Resolver;

#[derive(Args, Debug)]
pub struct OrderCommand {
    /// Path to the manifest
    manifest: PathBuf,

    /// Name of the set to order
    #[arg(short, long)]
    set: String,

    /// Fail when a declared dependency is not in the set
    #[arg(long, conflicts_with = "lenient")]
    strict: bool,

    /// Ignore declared dependencies that are not in the set
    #[arg(long)]
    lenient: bool,

    /// Skip the duplicate kind check
    #[arg(long)]
    allow_duplicates: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct OrderReport<'a> {
    set: &'a str,
    order: Vec<&'a str>,
}

impl OrderCommand {
    pub fn execute(self, config_path: Option<&Path>) -> Result<()> {
        let ctx = ManifestContext::load(&self.manifest, config_path)?;
        let config = ctx
            .config
            .with_overrides(strictness(self.strict, self.lenient), duplicate_check(self.allow_duplicates));
        let items = ctx.manifest.set(&self.set)?.kinds();

        let set_name = self.set.clone();
        let resolver = Resolver::new(&ctx.registry)
            .with_config(config)
            .with_error_mapper(move |e| anyhow::Error::new(e).context(format!("Failed to order set '{set_name}'")));

        let ordered = resolver.order(&items)?;
        tracing::debug!("Ordered {} items of set '{}'", ordered.len(), self.set);

        println!("{}", self.render(&ordered)?);
        Ok(())
    }

    fn render(&self, ordered: &[&KindName]) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(ordered
                .iter()
                .enumerate()
                .map(|(i, kind)| format!("{}. {}", i + 1, kind))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Json => {
                let report = OrderReport {
                    set: &self.set,
                    order: ordered.iter().map(|k| k.as_str()).collect(),
                };
                Ok(serde_json::to_string_pretty(&report)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(format: OutputFormat) -> OrderCommand {
        OrderCommand {
            manifest: PathBuf::from("scene.toml"),
            set: "player".to_string(),
            strict: false,
            lenient: false,
            allow_duplicates: false,
            format,
        }
    }

    #[test]
    fn test_render_text() {
        let kinds = [KindName::from("Transform"), KindName::from("Rigidbody")];
        let ordered: Vec<&KindName> = kinds.iter().collect();
        assert_eq!(command(OutputFormat::Text).render(&ordered).unwrap(), "1. Transform\n2. Rigidbody");
    }

    #[test]
    fn test_render_json() {
        let kinds = [KindName::from("Transform"), KindName::from("Rigidbody")];
        let ordered: Vec<&KindName> = kinds.iter().collect();
        let json = command(OutputFormat::Json).render(&ordered).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["set"], "player");
        assert_eq!(value["order"], serde_json::json!(["Transform", "Rigidbody"]));
    }
}
