//! AI provider configuration
//!
//! Insight generation is optional. Without an API key every insight is
//! created from the fallback content.

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::ai::OpenAIConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// API key for an OpenAI-compatible endpoint
    pub api_key: Option<Secret<String>>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retries on transient failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Provider configuration, or `None` when no key is set.
    pub fn provider_config(&self) -> Option<OpenAIConfig> {
        let key = self.api_key.as_ref().filter(|_| self.is_enabled())?;
        Some(
            OpenAIConfig::new(key.expose_secret().clone())
                .with_model(&self.model)
                .with_base_url(&self.base_url)
                .with_timeout(self.timeout())
                .with_max_retries(self.max_retries),
        )
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidAiBaseUrl);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    20
}

fn default_retries() -> u32 {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_without_key() {
        let config = AiConfig::default();
        assert!(!config.is_enabled());
        assert!(config.provider_config().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_key_is_disabled() {
        let config = AiConfig {
            api_key: Some(Secret::new(String::new())),
            ..Default::default()
        };
        assert!(!config.is_enabled());
    }

    #[test]
    fn test_provider_config_carries_settings() {
        let config = AiConfig {
            api_key: Some(Secret::new("sk-test".to_string())),
            model: "gpt-4o".to_string(),
            timeout_secs: 5,
            ..Default::default()
        };
        let provider = config.provider_config().unwrap();
        assert_eq!(provider.model, "gpt-4o");
        assert_eq!(provider.timeout, Duration::from_secs(5));
        assert_eq!(provider.max_retries, 2);
    }

    #[test]
    fn test_validation_rejects_bad_base_url() {
        let config = AiConfig {
            base_url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidAiBaseUrl)));
    }
}
