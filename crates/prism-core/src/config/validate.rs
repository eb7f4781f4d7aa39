//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.providers.gemini.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "providers.gemini.model must not be empty".into(),
            ));
        }
        if self.providers.gemini.max_output_tokens == Some(0) {
            return Err(ConfigError::ValidationError(
                "providers.gemini.max_output_tokens must be > 0".into(),
            ));
        }
        if self.providers.openai.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "providers.openai.model must not be empty".into(),
            ));
        }
        if self.providers.openai.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "providers.openai.max_tokens must be > 0".into(),
            ));
        }
        if self.history.path.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "history.path must not be empty".into(),
            ));
        }
        if self.limits.provider_timeout_ms == Some(0) {
            return Err(ConfigError::ValidationError(
                "limits.provider_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.max_image_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_size_mb must be > 0".into(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(format!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }
        Ok(())
    }
}
