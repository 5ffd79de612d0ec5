//! Manifest fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use crate::declaration::DeclarationRegistry;
use crate::manifest::Manifest;

/// Components with a `Collider -> Rigidbody -> Transform` requirement chain,
/// an asset hierarchy with its own rule, and four sets that all pass `check`.
pub const SAMPLE_MANIFEST: &str = r#"
[kinds]
Transform = { base = "Component" }
Rigidbody = { base = "Component" }
Collider = { base = "Component" }
Asset = {}
Texture = { base = "Asset" }
Material = { base = "Asset" }

[rules]
AssetDependency = { base = "Asset" }

[[declarations]]
kind = "Rigidbody"
types = ["Transform"]

[[declarations]]
kind = "Collider"
types = ["Rigidbody"]

[[declarations]]
kind = "Material"
rule = "AssetDependency"
types = ["Texture"]

[sets.player]
items = ["Collider", "Rigidbody", "Transform"]
main = "Rigidbody"

[sets.body]
items = ["Rigidbody", "Transform"]
providers = "shared"

[sets.shared]
items = ["Transform"]

[sets.materials]
items = ["Material", "Texture"]
"#;

/// Write `content` to `deporder.toml` in `dir` and return its path.
pub fn write_manifest(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("deporder.toml");
    fs::write(&path, content).unwrap_or_else(|e| panic!("Failed to write {}: {e}", path.display()));
    path
}

/// Registry built from [`SAMPLE_MANIFEST`].
pub fn sample_registry() -> DeclarationRegistry {
    Manifest::from_toml(SAMPLE_MANIFEST)
        .and_then(|m| Ok(m.registry()?))
        .unwrap_or_else(|e| panic!("Sample manifest is invalid: {e:#}"))
}

/// Named manifest content for tests that need more than the sample.
#[derive(Clone, Debug)]
pub struct ManifestFixture {
    pub name: String,
    pub content: String,
}

impl ManifestFixture {
    /// The sample manifest.
    pub fn sample() -> Self {
        Self {
            name: "sample".to_string(),
            content: SAMPLE_MANIFEST.trim().to_string(),
        }
    }

    /// Two components requiring each other.
    pub fn cyclic() -> Self {
        Self {
            name: "cyclic".to_string(),
            content: r#"
[kinds]
X = { base = "Component" }
Y = { base = "Component" }

[[declarations]]
kind = "X"
types = ["Y"]

[[declarations]]
kind = "Y"
types = ["X"]

[sets.loop]
items = ["X", "Y"]
"#
            .trim()
            .to_string(),
        }
    }

    /// A set whose items declare a kind it does not contain.
    pub fn incomplete() -> Self {
        Self {
            name: "incomplete".to_string(),
            content: r#"
[kinds]
Transform = { base = "Component" }
Rigidbody = { base = "Component" }

[[declarations]]
kind = "Rigidbody"
types = ["Transform"]

[sets.body]
items = ["Rigidbody"]
"#
            .trim()
            .to_string(),
        }
    }

    /// Write the fixture into `dir` as `deporder.toml`.
    pub fn write_to(&self, dir: &Path) -> PathBuf {
        write_manifest(dir, &self.content)
    }
}
