//! Generic TOML file parsing with error context.

use anyhow::{Context, Result};
use std::path::Path;

/// Read and deserialize a TOML file.
///
/// # Errors
///
/// The error names the file and whether reading or parsing failed; the
/// underlying [`std::io::Error`] or [`toml::de::Error`] stays in the chain.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: T = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[derive(Debug, serde::Deserialize)]
    struct Sample {
        name: String,
        value: i32,
    }

    #[test]
    fn test_parse_config() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("sample.toml");
        std::fs::write(&config_path, "name = \"scene\"\nvalue = 3\n").unwrap();

        let config: Sample = parse_config(&config_path).unwrap();
        assert_eq!(config.name, "scene");
        assert_eq!(config.value, 3);
    }

    #[test]
    fn test_parse_config_error_keeps_toml_cause() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("invalid.toml");
        std::fs::write(&config_path, "invalid = toml {").unwrap();

        let err = parse_config::<Sample>(&config_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
        assert!(err.chain().any(|cause| cause.downcast_ref::<toml::de::Error>().is_some()));
    }

    #[test]
    fn test_parse_config_missing_file() {
        let temp = tempdir().unwrap();
        let err = parse_config::<Sample>(&temp.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
