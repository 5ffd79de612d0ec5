//! Display the dependency tree of a kind.
//!
//! ```text
//! Collider
//! └── Rigidbody
//!     └── Transform
//! ```
//!
//! A kind reached again along the same branch is marked
//! `(circular reference)` and not expanded further.

use anyhow::{Result, bail};
use clap::Args;
use std::path::{Path, PathBuf};

use super::common::ManifestContext;
use crate::core::KindName;
use crate::declaration::DeclarationRegistry;
use crate::resolver::{DependencyGraph, DependencySource};

#[derive(Args, Debug)]
pub struct TreeCommand {
    /// Path to the manifest
    manifest: PathBuf,

    /// Kind at the root of the tree
    kind: String,

    /// Only follow declarations made under this rule
    #[arg(short, long)]
    rule: Option<String>,
}

impl TreeCommand {
    pub fn execute(self, config_path: Option<&Path>) -> Result<()> {
        let ctx = ManifestContext::load(&self.manifest, config_path)?;
        print!("{}", self.render(&ctx.registry)?);
        Ok(())
    }

    fn render(&self, registry: &DeclarationRegistry) -> Result<String> {
        if !registry.contains_kind(&self.kind) {
            bail!("Unknown kind '{}' in {}", self.kind, self.manifest.display());
        }
        let root = KindName::from(self.kind.as_str());

        let graph = match &self.rule {
            Some(rule) => build(root.clone(), &registry.rule_view(rule)?),
            None => build(root.clone(), registry),
        };
        tracing::debug!(
            "Dependency graph of '{}': {} kinds, {} edges",
            root,
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph.to_tree_string(&root))
    }
}

fn build<S: DependencySource<KindName> + ?Sized>(root: KindName, source: &S) -> DependencyGraph<KindName> {
    DependencyGraph::from_source([root], source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_registry;

    fn command(kind: &str, rule: Option<&str>) -> TreeCommand {
        TreeCommand {
            manifest: PathBuf::from("scene.toml"),
            kind: kind.to_string(),
            rule: rule.map(str::to_string),
        }
    }

    #[test]
    fn test_render_chain() {
        let registry = sample_registry();
        let tree = command("Collider", None).render(&registry).unwrap();
        assert_eq!(tree, "Collider\n└── Rigidbody\n    └── Transform\n");
    }

    #[test]
    fn test_render_by_rule() {
        let registry = sample_registry();
        let tree = command("Material", Some("AssetDependency")).render(&registry).unwrap();
        assert_eq!(tree, "Material\n└── Texture\n");

        let tree = command("Collider", Some("AssetDependency")).render(&registry).unwrap();
        assert_eq!(tree, "Collider\n");

        assert!(command("Material", Some("Nope")).render(&registry).is_err());
    }

    #[test]
    fn test_unknown_kind() {
        let registry = sample_registry();
        let err = command("Ghost", None).render(&registry).unwrap_err();
        assert!(err.to_string().contains("Unknown kind 'Ghost'"));
    }
}
