//! Resolver configuration.
//!
//! [`ResolverConfig`] carries the switches that change how the resolver treats
//! an item set. It is read from the `[resolver]` table of a manifest, or from
//! a standalone TOML file through [`parse_config`], and the CLI flags
//! override whatever was loaded.
//!
//! ```toml
//! [resolver]
//! error_on_missing = true   # declared kinds must be present in the set
//! check_duplicates = true   # each kind may appear once per set
//! ```
//!
//! Both switches default to `true`.

pub mod parser;

pub use parser::parse_config;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

const fn default_true() -> bool {
    true
}

/// Options for [`Resolver`](crate::resolver::Resolver) and the CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    /// Fail with `MissingDependency` when a declared kind is absent from the set.
    #[serde(default = "default_true")]
    pub error_on_missing: bool,

    /// Run the duplicate check before ordering.
    #[serde(default = "default_true")]
    pub check_duplicates: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            error_on_missing: true,
            check_duplicates: true,
        }
    }
}

/// A `[resolver]` table read as overrides: only the keys it sets are `Some`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverOverrides {
    #[serde(default)]
    pub error_on_missing: Option<bool>,
    #[serde(default)]
    pub check_duplicates: Option<bool>,
}

/// Standalone configuration file layout: only the `[resolver]` table.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    resolver: ResolverOverrides,
}

fn read_overrides(path: &Path) -> Result<ResolverOverrides> {
    let file: ConfigFile = parse_config(path)?;
    tracing::debug!("Loaded resolver config from {}: {:?}", path.display(), file.resolver);
    Ok(file.resolver)
}

impl ResolverConfig {
    /// Missing dependencies are ignored for ordering purposes.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            error_on_missing: false,
            ..Self::default()
        }
    }

    /// Load the `[resolver]` table of a TOML file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not valid TOML for this layout.
    pub fn load(path: &Path) -> Result<Self> {
        Self::default().merge_file(path)
    }

    /// Apply the keys set in the `[resolver]` table of a TOML file; keys the
    /// file leaves out keep their current value.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not valid TOML for this layout.
    pub fn merge_file(self, path: &Path) -> Result<Self> {
        let overrides = read_overrides(path)?;
        Ok(self.with_overrides(overrides.error_on_missing, overrides.check_duplicates))
    }

    /// Apply command-line overrides; `None` keeps the loaded value.
    #[must_use]
    pub fn with_overrides(mut self, error_on_missing: Option<bool>, check_duplicates: Option<bool>) -> Self {
        if let Some(strict) = error_on_missing {
            self.error_on_missing = strict;
        }
        if let Some(check) = check_duplicates {
            self.check_duplicates = check;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert!(config.error_on_missing);
        assert!(config.check_duplicates);
        assert!(!ResolverConfig::lenient().error_on_missing);
    }

    #[test]
    fn test_partial_table_uses_defaults() {
        let config: ResolverConfig = toml::from_str("error_on_missing = false").unwrap();
        assert!(!config.error_on_missing);
        assert!(config.check_duplicates);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: Result<ResolverConfig, _> = toml::from_str("strict = true");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("deporder.toml");
        std::fs::write(&path, "[resolver]\ncheck_duplicates = false\n").unwrap();

        let config = ResolverConfig::load(&path).unwrap();
        assert!(config.error_on_missing);
        assert!(!config.check_duplicates);
    }

    #[test]
    fn test_load_without_resolver_table() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("empty.toml");
        std::fs::write(&path, "").unwrap();
        assert_eq!(ResolverConfig::load(&path).unwrap(), ResolverConfig::default());
    }

    #[test]
    fn test_merge_file_keeps_unset_keys() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("resolver.toml");
        std::fs::write(&path, "[resolver]\nerror_on_missing = false\n").unwrap();

        let base = ResolverConfig {
            error_on_missing: true,
            check_duplicates: false,
        };
        let merged = base.merge_file(&path).unwrap();
        assert!(!merged.error_on_missing);
        assert!(!merged.check_duplicates);
    }

    #[test]
    fn test_merge_file_rejects_unknown_key() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("resolver.toml");
        std::fs::write(&path, "[resolver]\nstrict = true\n").unwrap();
        assert!(ResolverConfig::default().merge_file(&path).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = ResolverConfig::default().with_overrides(Some(false), None);
        assert!(!config.error_on_missing);
        assert!(config.check_duplicates);

        let config = ResolverConfig::default().with_overrides(None, Some(false));
        assert!(config.error_on_missing);
        assert!(!config.check_duplicates);
    }
}
