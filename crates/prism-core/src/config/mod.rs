//! Configuration management for Prism.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. All config structs implement `Default`, so a missing file or a
//! partial file both work.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure for Prism.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Provider credentials and models
    pub providers: ProvidersConfig,

    /// History log settings
    pub history: HistoryConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.prism.prism/config.toml
    /// - Linux: ~/.config/prism/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\prism\config\config.toml
    ///
    /// Falls back to ~/.prism/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "prism", "prism")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".prism").join("config.toml")
            })
    }

    /// Get the resolved history log path (with ~ expansion).
    pub fn history_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.history.path);
        PathBuf::from(expanded.into_owned())
    }

    /// Per-provider timeout, if one is configured.
    pub fn provider_timeout(&self) -> Option<Duration> {
        self.limits.provider_timeout_ms.map(Duration::from_millis)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.providers.gemini.model, "gemini-3-flash-preview");
        assert_eq!(config.providers.openai.model, "gpt-4o");
        assert_eq!(config.providers.openai.max_tokens, 1000);
        assert_eq!(config.history.path, "historico_interacoes.txt");
        assert!(config.limits.provider_timeout_ms.is_none());
        assert!(config.provider_timeout().is_none());
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[providers.gemini]"));
        assert!(toml.contains("[providers.openai]"));
        assert!(toml.contains("[history]"));
        assert!(!toml.contains("provider_timeout_ms"));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [providers.openai]
            model = "gpt-4o-mini"

            [limits]
            provider_timeout_ms = 30000
            "#,
        )
        .unwrap();
        assert_eq!(config.providers.openai.model, "gpt-4o-mini");
        assert_eq!(config.providers.openai.api_key, "${OPENAI_API_KEY}");
        assert_eq!(config.providers.gemini.model, "gemini-3-flash-preview");
        assert_eq!(config.provider_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[history]\npath = \"/tmp/prism-history.txt\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(
            config.history_path(),
            PathBuf::from("/tmp/prism-history.txt")
        );
    }

    #[test]
    fn test_load_from_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[history\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
