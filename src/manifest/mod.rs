//! Manifest parsing.
//!
//! A manifest describes kinds, rules, declarations and named item sets in
//! TOML, so the resolver can be driven from the command line without a host
//! engine.
//!
//! ```toml
//! [resolver]
//! error_on_missing = true
//!
//! [kinds]
//! Transform = { base = "Component" }
//! Rigidbody = { base = "Component" }
//! Asset = {}
//! Texture = { base = "Asset" }
//!
//! [rules]
//! AssetDependency = { base = "Asset" }
//!
//! [[declarations]]
//! kind = "Rigidbody"
//! types = ["Transform"]            # rule defaults to RequireComponent
//!
//! [sets.player]
//! items = ["Rigidbody", "Transform"]
//! main = "Rigidbody"
//! providers = "shared"              # optional cross-set check
//! ```
//!
//! `Component` and the `RequireComponent` rule are built in. Kinds may be
//! listed in any order; bases are defined before the kinds deriving from them.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::{ResolverConfig, parse_config};
use crate::core::{DepError, KindName};
use crate::declaration::{DeclarationRegistry, REQUIRE_COMPONENT};
use crate::resolver::resolve_order;

fn default_rule() -> String {
    REQUIRE_COMPONENT.to_string()
}

/// A kind entry under `[kinds]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KindSpec {
    /// Base kind, if any.
    #[serde(default)]
    pub base: Option<String>,
}

/// A rule entry under `[rules]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSpec {
    /// Kinds the rule may reference must derive from this one.
    pub base: String,
}

/// One `[[declarations]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclarationSpec {
    /// Declaring kind.
    pub kind: String,
    /// Rule the declaration is made under.
    #[serde(default = "default_rule")]
    pub rule: String,
    /// Referenced kinds (one to three).
    pub types: Vec<String>,
}

/// A named item set under `[sets.<name>]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetSpec {
    /// Item kinds, in input order.
    pub items: Vec<String>,
    /// Kind of the item that must be part of the set.
    #[serde(default)]
    pub main: Option<String>,
    /// Name of another set whose items must satisfy this set's declarations.
    #[serde(default)]
    pub providers: Option<String>,
}

impl SetSpec {
    /// The items as kind names.
    pub fn kinds(&self) -> Vec<KindName> {
        self.items.iter().map(|s| KindName::from(s.as_str())).collect()
    }
}

/// Parsed manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub kinds: BTreeMap<String, KindSpec>,
    #[serde(default)]
    pub rules: BTreeMap<String, RuleSpec>,
    #[serde(default)]
    pub declarations: Vec<DeclarationSpec>,
    #[serde(default)]
    pub sets: BTreeMap<String, SetSpec>,
}

impl Manifest {
    /// Read and parse a manifest file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a valid manifest.
    pub fn load(path: &Path) -> Result<Self> {
        let manifest: Self = parse_config(path)?;
        tracing::debug!(
            "Loaded manifest {} ({} kinds, {} declarations, {} sets)",
            path.display(),
            manifest.kinds.len(),
            manifest.declarations.len(),
            manifest.sets.len()
        );
        Ok(manifest)
    }

    /// Parse a manifest from a string.
    ///
    /// # Errors
    ///
    /// Fails if `content` is not a valid manifest.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse manifest")
    }

    /// Build the declaration registry the manifest describes.
    ///
    /// # Errors
    ///
    /// [`DepError::Configuration`] for any malformed kind, rule or declaration,
    /// including a cyclic kind hierarchy.
    pub fn registry(&self) -> Result<DeclarationRegistry, DepError> {
        let mut registry = DeclarationRegistry::with_builtin_rules();

        let names: Vec<KindName> = self.kinds.keys().map(|k| KindName::from(k.as_str())).collect();
        let base_of = |kind: &KindName| -> Vec<Option<KindName>> {
            vec![self.kinds.get(kind.as_str()).and_then(|spec| spec.base.as_deref()).map(KindName::from)]
        };
        let ordered = resolve_order(&names, &base_of, false).map_err(|e| match e {
            DepError::CircularDependency {
                chain,
            } => DepError::configuration(format!("kind hierarchy is cyclic: {chain}")),
            other => other,
        })?;

        for kind in ordered {
            let base = self.kinds.get(kind.as_str()).and_then(|spec| spec.base.clone());
            registry.define_kind(kind.clone(), base)?;
        }

        for (rule, spec) in &self.rules {
            registry.define_rule(rule.clone(), spec.base.as_str())?;
        }

        for declaration in &self.declarations {
            registry.declare(
                declaration.kind.as_str(),
                &declaration.rule,
                declaration.types.iter().map(|t| Some(t.as_str())),
            )?;
        }

        Ok(registry)
    }

    /// Look up a named set.
    ///
    /// # Errors
    ///
    /// Fails with the list of known sets if `name` is not defined.
    pub fn set(&self, name: &str) -> Result<&SetSpec> {
        self.sets.get(name).ok_or_else(|| {
            let known: Vec<&str> = self.sets.keys().map(String::as_str).collect();
            anyhow!("Unknown set '{}'. Defined sets: {}", name, known.join(", "))
        })
    }
}
