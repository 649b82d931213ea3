//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::GateConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading. Any of these is fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    ParseToml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("unsupported config format {extension:?} (expected .toml or .json)")]
    UnsupportedFormat { extension: String },

    #[error("validation failed: {}", render(.0))]
    Validation(Vec<ValidationError>),
}

fn render(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML or JSON file.
///
/// The format is chosen by file extension; the original agent shipped a
/// JSON config, deployments here typically use TOML.
pub fn load_config(path: &Path) -> Result<GateConfig, ConfigError> {
    let content = fs::read_to_string(path)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let config: GateConfig = match extension.as_str() {
        "toml" => toml::from_str(&content)?,
        "json" => serde_json::from_str(&content)?,
        other => {
            return Err(ConfigError::UnsupportedFormat {
                extension: other.to_string(),
            })
        }
    };

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_toml_config() {
        let path = write_temp(
            "session_gate_loader_test.toml",
            r#"
            [target_site]
            root = "http://localhost:9000"

            [siteminder]
            session_expiry_minutes = 5

            [users.bob]
            password = "test1234"

            [users.bob.auth_headers]
            header1 = "auth1"
            "#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.target_site.root, "http://localhost:9000");
        assert_eq!(config.siteminder.session_expiry_minutes, 5);
        assert_eq!(config.users["bob"].auth_headers["header1"], "auth1");

        fs::remove_file(path).unwrap_or_default();
    }

    #[test]
    fn loads_json_config() {
        let path = write_temp(
            "session_gate_loader_test.json",
            r#"{
                "target_site": { "root": "http://localhost:9100" },
                "users": { "alice": { "password": "pw" } }
            }"#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.target_site.root, "http://localhost:9100");
        assert_eq!(config.users["alice"].password, "pw");

        fs::remove_file(path).unwrap_or_default();
    }

    #[test]
    fn rejects_unknown_extension() {
        let path = write_temp("session_gate_loader_test.yaml", "root: nope");
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
        fs::remove_file(path).unwrap_or_default();
    }

    #[test]
    fn surfaces_validation_errors() {
        let path = write_temp(
            "session_gate_loader_invalid.toml",
            r#"
            [siteminder]
            session_expiry_minutes = 0
            "#,
        );

        let err = load_config(&path).unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 1),
            other => panic!("expected validation error, got {other}"),
        }

        fs::remove_file(path).unwrap_or_default();
    }
}
