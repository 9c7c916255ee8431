//! Configuration error types.

use thiserror::Error;

/// Errors loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying loader failure (missing variable, type mismatch).
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

/// Semantic validation failure for a loaded configuration value.
#[derive(Debug, Clone, Error)]
#[error("invalid configuration: {field} {reason}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// Why the value was rejected.
    pub reason: String,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
