//! Field identifiers, format rules, and the per-service field schema.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Stable string key naming one slot in a form schema.
///
/// Identifiers are compared exactly (case-sensitive) and must be unique
/// within a schema. Emptiness is rejected at schema construction, not here,
/// so ad-hoc ids can be built cheaply in lookups and tests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    /// Creates a field identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FieldId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Basic format rule declared per field.
///
/// These are shape checks only. A value failing its rule is dropped during
/// normalization, never corrected; semantic validation (checksums, date
/// plausibility) is out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldFormat {
    /// Any non-empty string.
    Any,
    /// Fixed-length numeric code, e.g. the 13-digit CNP personal code.
    NumericCode { digits: usize },
}

impl FieldFormat {
    /// Checks whether a trimmed value satisfies this format rule.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            FieldFormat::Any => true,
            FieldFormat::NumericCode { digits } => {
                value.len() == *digits && value.chars().all(|c| c.is_ascii_digit())
            }
        }
    }
}

/// One field declaration: identifier, human label, and format rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Stable identifier, unique within the schema.
    pub id: FieldId,
    /// Human-readable label shown to the user and printed on documents.
    pub label: String,
    /// Format rule applied during normalization.
    pub format: FieldFormat,
}

impl FieldSpec {
    /// Creates a free-form field.
    pub fn text(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: FieldId::new(id),
            label: label.into(),
            format: FieldFormat::Any,
        }
    }

    /// Creates a fixed-length numeric code field.
    pub fn numeric_code(
        id: impl Into<String>,
        label: impl Into<String>,
        digits: usize,
    ) -> Self {
        Self {
            id: FieldId::new(id),
            label: label.into(),
            format: FieldFormat::NumericCode { digits },
        }
    }
}

/// Ordered, immutable set of fields one service requires.
///
/// # Invariants
///
/// - Field ids are non-empty and unique
/// - Declaration order is preserved; it defines the order of `missing`
///   fields in completion reports and of rendered documents
///
/// An empty schema is permitted (a configuration defect upstream) and is
/// reported as fully complete rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    fields: Vec<FieldSpec>,
}

impl FieldSchema {
    /// Builds a schema from field declarations.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if any id or label is empty
    /// - `DuplicateField` if an id is declared twice
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, DomainError> {
        for (i, spec) in fields.iter().enumerate() {
            if spec.id.as_str().trim().is_empty() {
                return Err(DomainError::new(
                    ErrorCode::EmptyField,
                    format!("Field at position {} has an empty identifier", i),
                ));
            }
            if spec.label.trim().is_empty() {
                return Err(DomainError::new(
                    ErrorCode::EmptyField,
                    format!("Field '{}' has an empty label", spec.id),
                ));
            }
            if fields[..i].iter().any(|other| other.id == spec.id) {
                return Err(DomainError::new(
                    ErrorCode::DuplicateField,
                    format!("Field '{}' is declared more than once", spec.id),
                ));
            }
        }
        Ok(Self { fields })
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a field spec by raw key.
    ///
    /// This is the single point where extractor output keys are checked for
    /// schema membership.
    pub fn spec_for(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.id.as_str() == key)
    }

    /// Returns true if the id names a field in this schema.
    pub fn contains(&self, id: &FieldId) -> bool {
        self.spec_for(id.as_str()).is_some()
    }

    /// Iterates fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }

    /// Iterates field ids in declaration order.
    pub fn field_ids(&self) -> impl Iterator<Item = &FieldId> {
        self.fields.iter().map(|spec| &spec.id)
    }

    /// Returns the id → label mapping as a JSON object, preserving order.
    ///
    /// Used when embedding the schema into extractor prompts.
    pub fn labels_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for spec in &self.fields {
            map.insert(
                spec.id.as_str().to_string(),
                serde_json::Value::String(spec.label.clone()),
            );
        }
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::text("LastName", "Family Name"),
            FieldSpec::text("FirstName", "First Name"),
            FieldSpec::numeric_code("CNP", "Personal Numerical Code (CNP)", 13),
        ]
    }

    #[test]
    fn schema_preserves_declaration_order() {
        let schema = FieldSchema::new(sample_fields()).unwrap();
        let ids: Vec<&str> = schema.field_ids().map(FieldId::as_str).collect();
        assert_eq!(ids, vec!["LastName", "FirstName", "CNP"]);
    }

    #[test]
    fn schema_rejects_duplicate_ids() {
        let fields = vec![
            FieldSpec::text("LastName", "Family Name"),
            FieldSpec::text("LastName", "Family Name Again"),
        ];
        let err = FieldSchema::new(fields).unwrap_err();
        assert_eq!(err.code, crate::domain::foundation::ErrorCode::DuplicateField);
    }

    #[test]
    fn schema_rejects_empty_id() {
        let fields = vec![FieldSpec::text("  ", "Blank")];
        let err = FieldSchema::new(fields).unwrap_err();
        assert_eq!(err.code, crate::domain::foundation::ErrorCode::EmptyField);
    }

    #[test]
    fn schema_rejects_empty_label() {
        let fields = vec![FieldSpec::text("LastName", "")];
        let err = FieldSchema::new(fields).unwrap_err();
        assert_eq!(err.code, crate::domain::foundation::ErrorCode::EmptyField);
    }

    #[test]
    fn empty_schema_is_allowed() {
        let schema = FieldSchema::new(Vec::new()).unwrap();
        assert!(schema.is_empty());
        assert_eq!(schema.len(), 0);
    }

    #[test]
    fn spec_for_is_case_sensitive() {
        let schema = FieldSchema::new(sample_fields()).unwrap();
        assert!(schema.spec_for("LastName").is_some());
        assert!(schema.spec_for("lastname").is_none());
    }

    #[test]
    fn numeric_code_matches_exact_length_digits() {
        let format = FieldFormat::NumericCode { digits: 13 };
        assert!(format.matches("1234567890123"));
        assert!(!format.matches("123456789012"));
        assert!(!format.matches("12345678901234"));
        assert!(!format.matches("123456789012a"));
    }

    #[test]
    fn any_format_matches_everything() {
        assert!(FieldFormat::Any.matches("Ion"));
        assert!(FieldFormat::Any.matches("str. Victoriei 12"));
    }

    #[test]
    fn labels_json_preserves_order() {
        let schema = FieldSchema::new(sample_fields()).unwrap();
        let json = serde_json::to_string(&schema.labels_json()).unwrap();
        let last = json.find("LastName").unwrap();
        let first = json.find("FirstName").unwrap();
        let cnp = json.find("CNP").unwrap();
        assert!(last < first && first < cnp);
    }
}
