//! Vision provider trait, request type, and factory.
//!
//! Every provider takes the same input (image bytes, MIME type, prompt) and
//! returns answer text. The factory resolves API keys up front so a missing
//! key is a configuration error, never a failed call.

use crate::config::ProvidersConfig;
use crate::error::{ConfigError, ProviderError};
use crate::types::{ImagePayload, Prompt};
use async_trait::async_trait;
use base64::Engine;
use std::sync::Arc;

use super::gemini::GeminiProvider;
use super::openai::OpenAiProvider;

/// The uniform input handed to every provider.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    /// The uploaded image
    pub image: ImagePayload,
    /// The user's question or instruction
    pub prompt: Prompt,
}

impl VisionRequest {
    pub fn new(image: ImagePayload, prompt: Prompt) -> Self {
        Self { image, prompt }
    }

    /// Standard base64 encoding of the image bytes.
    pub fn base64_data(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(self.image.bytes())
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.image.mime_type(),
            self.base64_data()
        )
    }
}

/// Trait that all vision providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the dispatcher holds `Arc<dyn VisionProvider>`).
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Provider name for logging (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// Model identifier sent with each request.
    fn model(&self) -> &str;

    /// Ask the model about the image and return its answer text.
    async fn invoke(&self, request: &VisionRequest) -> Result<String, ProviderError>;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Name to report when a key cannot be resolved: the referenced env var,
/// or the config field for literal values.
fn key_source(value: &str, field: &str) -> String {
    if value.starts_with("${") && value.ends_with('}') {
        value[2..value.len() - 1].to_string()
    } else {
        field.to_string()
    }
}

/// Both providers of a comparison, in fixed role order.
pub struct ProviderPair {
    /// Provider A (Gemini)
    pub a: Arc<dyn VisionProvider>,
    /// Provider B (OpenAI)
    pub b: Arc<dyn VisionProvider>,
}

/// Factory that builds the provider pair from config.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Names of the API keys that don't resolve, in role order (A, B).
    ///
    /// A `${VAR}` reference is reported by its variable name, a blank literal
    /// by its config field.
    pub fn missing_keys(config: &ProvidersConfig) -> Vec<String> {
        [
            (&config.gemini.api_key, "providers.gemini.api_key"),
            (&config.openai.api_key, "providers.openai.api_key"),
        ]
        .into_iter()
        .filter(|(value, _)| resolve_env_var(value).is_none())
        .map(|(value, field)| key_source(value, field))
        .collect()
    }

    /// Create both providers, or report every API key that is missing.
    ///
    /// No request is made here; a `ConfigError` means nothing was sent.
    pub fn create_pair(config: &ProvidersConfig) -> Result<ProviderPair, ConfigError> {
        let (Some(gemini_key), Some(openai_key)) = (
            resolve_env_var(&config.gemini.api_key),
            resolve_env_var(&config.openai.api_key),
        ) else {
            return Err(ConfigError::MissingApiKeys(Self::missing_keys(config)));
        };

        let mut gemini = GeminiProvider::new(&gemini_key)
            .with_model(&config.gemini.model)
            .with_endpoint(&config.gemini.endpoint);
        if let Some(max) = config.gemini.max_output_tokens {
            gemini = gemini.with_max_output_tokens(max);
        }

        let openai = OpenAiProvider::new(&openai_key)
            .with_model(&config.openai.model)
            .with_endpoint(&config.openai.endpoint)
            .with_max_tokens(config.openai.max_tokens);

        tracing::debug!(
            "Providers ready: A={} ({}), B={} ({})",
            gemini.name(),
            gemini.model(),
            openai.name(),
            openai.model()
        );

        Ok(ProviderPair {
            a: Arc::new(gemini),
            b: Arc::new(openai),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeminiConfig, OpenAiConfig};

    fn request() -> VisionRequest {
        VisionRequest::new(
            ImagePayload::new("cat.png", vec![1, 2, 3]),
            Prompt::new("What is this?").unwrap(),
        )
    }

    #[test]
    fn test_data_url_uses_payload_mime_type() {
        let url = request().data_url();
        assert_eq!(url, "data:image/png;base64,AQID");
    }

    #[test]
    fn test_data_url_unknown_extension_is_jpeg() {
        let req = VisionRequest::new(
            ImagePayload::new("scan.bmp", vec![1, 2, 3]),
            Prompt::new("?").unwrap(),
        );
        assert!(req.data_url().starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), None);
    }

    #[test]
    fn test_create_pair_with_literal_keys() {
        let config = ProvidersConfig {
            gemini: GeminiConfig {
                api_key: "g-key".to_string(),
                ..GeminiConfig::default()
            },
            openai: OpenAiConfig {
                api_key: "o-key".to_string(),
                model: "gpt-4o-mini".to_string(),
                ..OpenAiConfig::default()
            },
        };
        let pair = ProviderFactory::create_pair(&config).unwrap();
        assert_eq!(pair.a.name(), "gemini");
        assert_eq!(pair.a.model(), "gemini-3-flash-preview");
        assert_eq!(pair.b.name(), "openai");
        assert_eq!(pair.b.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_create_pair_names_missing_gemini_key() {
        let config = ProvidersConfig {
            gemini: GeminiConfig {
                api_key: "${PRISM_TEST_UNSET_GEMINI_KEY_9F2}".to_string(),
                ..GeminiConfig::default()
            },
            openai: OpenAiConfig {
                api_key: "o-key".to_string(),
                ..OpenAiConfig::default()
            },
        };
        match ProviderFactory::create_pair(&config) {
            Err(ConfigError::MissingApiKeys(keys)) => {
                assert_eq!(keys, vec!["PRISM_TEST_UNSET_GEMINI_KEY_9F2".to_string()]);
            }
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("expected missing key error"),
        }
    }

    #[test]
    fn test_create_pair_names_both_missing_keys() {
        let config = ProvidersConfig {
            gemini: GeminiConfig {
                api_key: String::new(),
                ..GeminiConfig::default()
            },
            openai: OpenAiConfig {
                api_key: "${PRISM_TEST_UNSET_OPENAI_KEY_9F2}".to_string(),
                ..OpenAiConfig::default()
            },
        };
        let Err(err) = ProviderFactory::create_pair(&config) else {
            panic!("expected missing key error");
        };
        let message = err.to_string();
        assert!(message.contains("providers.gemini.api_key"), "{message}");
        assert!(message.contains("PRISM_TEST_UNSET_OPENAI_KEY_9F2"), "{message}");
    }

    #[test]
    fn test_missing_keys_lists_each_unresolved_key() {
        let mut config = ProvidersConfig::default();
        config.gemini.api_key = "${PRISM_TEST_UNSET_GEMINI_KEY_4C1}".to_string();
        config.openai.api_key = "${PRISM_TEST_UNSET_OPENAI_KEY_4C1}".to_string();
        assert_eq!(
            ProviderFactory::missing_keys(&config),
            vec![
                "PRISM_TEST_UNSET_GEMINI_KEY_4C1".to_string(),
                "PRISM_TEST_UNSET_OPENAI_KEY_4C1".to_string(),
            ]
        );

        config.gemini.api_key = "g-key".to_string();
        config.openai.api_key = "o-key".to_string();
        assert!(ProviderFactory::missing_keys(&config).is_empty());
    }
}
