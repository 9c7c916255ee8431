//! Validated field value.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{DomainError, ErrorCode};

/// A non-empty, trimmed field value.
///
/// The type is only constructible through [`FieldValue::new`], so a
/// `KnownData` map can never hold empty strings. Deserialization goes
/// through the same validation, so serde is not a back door around it.
/// Placeholder filtering is a separate concern handled by normalization;
/// this type only guarantees non-emptiness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct FieldValue(String);

impl FieldValue {
    /// Creates a field value, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the value is empty after trimming
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::new(
                ErrorCode::EmptyField,
                "Field value cannot be empty",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FieldValue {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
