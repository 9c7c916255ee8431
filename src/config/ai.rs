//! Extraction provider configuration.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    1
}

/// OpenAI extractor configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// API key (required).
    pub api_key: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL for the API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds. Extractor calls are the only suspending
    /// operations in the pipeline, so this bound keeps a stalled service
    /// from blocking the case indefinitely.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries on transient failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl AiConfig {
    /// Returns the timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.trim().is_empty() {
            return Err(ValidationError::new("ai.api_key", "must not be empty"));
        }
        if !self.api_key.starts_with("sk-") {
            return Err(ValidationError::new(
                "ai.api_key",
                "must start with 'sk-'",
            ));
        }
        if self.base_url.trim().is_empty() {
            return Err(ValidationError::new("ai.base_url", "must not be empty"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::new(
                "ai.timeout_secs",
                "must be between 1 and 300",
            ));
        }
        if self.max_retries > 5 {
            return Err(ValidationError::new("ai.max_retries", "must be at most 5"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AiConfig {
        AiConfig {
            api_key: "sk-test".to_string(),
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn empty_api_key_fails() {
        let mut config = valid_config();
        config.api_key = "".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn api_key_without_prefix_fails() {
        let mut config = valid_config();
        config.api_key = "not-a-key".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_fails() {
        let mut config = valid_config();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn excessive_retries_fail() {
        let mut config = valid_config();
        config.max_retries = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn timeout_converts_to_duration() {
        assert_eq!(valid_config().timeout(), Duration::from_secs(30));
    }
}
