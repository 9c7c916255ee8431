//! Document output configuration.

use serde::Deserialize;

use super::error::ValidationError;

fn default_dir() -> String {
    "output".to_string()
}

/// Where rendered documents are written.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Output directory, created on first render if missing.
    #[serde(default = "default_dir")]
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
        }
    }
}

impl OutputConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.dir.trim().is_empty() {
            return Err(ValidationError::new("output.dir", "must not be empty"));
        }
        Ok(())
    }
}
