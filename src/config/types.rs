//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::logging::LoggingConfig;
use super::push::PushConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Engine configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Push delivery configuration.
    #[serde(default)]
    pub push: PushConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Returns `true` (for serde defaults).
pub(super) fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;
    use std::io::Write;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert!(config.push.enabled);
        assert_eq!(config.push.default_endpoint, "https://api.palaverapp.com/1/push");
        assert_eq!(config.push.timeout_secs, 10);
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::parse(
            r#"
            [push]
            enabled = false
            default_endpoint = "http://127.0.0.1:9000/push"
            timeout_secs = 3

            [logging]
            filter = "slircd_push=debug"
            format = "json"
            "#,
        )
        .unwrap();
        assert!(!config.push.enabled);
        assert_eq!(config.push.default_endpoint, "http://127.0.0.1:9000/push");
        assert_eq!(config.push.timeout_secs, 3);
        assert_eq!(config.logging.filter, "slircd_push=debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[push]\nuser_agent = \"test-agent\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.push.user_agent, "test-agent");
    }

    #[test]
    fn load_reports_missing_file_and_bad_toml() {
        assert!(matches!(
            Config::load("/nonexistent/slircd-push.toml"),
            Err(ConfigError::Io(_))
        ));
        assert!(matches!(
            Config::parse("[push\nenabled = 1"),
            Err(ConfigError::Parse(_))
        ));
    }
}
