//! Extraction result normalization.
//!
//! Extractors return whatever a language model produced: unknown keys,
//! nulls, placeholder prose, values that ignore declared format rules. This
//! module is the single choke point that turns that noise into a
//! [`NormalizedDelta`] safe to merge into case state.

use std::collections::BTreeMap;

use super::candidate::{ExtractionCandidate, NormalizedDelta};
use super::value::FieldValue;
use crate::domain::schema::FieldSchema;

/// Null-like tokens extractors emit for fields they could not read.
///
/// Compared case-insensitively against the trimmed value.
const PLACEHOLDER_TOKENS: &[&str] = &[
    "null",
    "none",
    "n/a",
    "na",
    "not provided",
    "not available",
    "unknown",
];

/// Cleans a raw candidate against the active schema.
///
/// Drops, in order of checking:
/// - keys not present in the schema (scoping invariant enforcement)
/// - absent/null values and values empty after trimming
/// - recognized placeholder tokens
/// - values failing the field's declared format rule
///
/// Surviving values are trimmed. Pure and deterministic; idempotent, so
/// normalizing an already-clean delta yields the same delta.
pub fn normalize(candidate: &ExtractionCandidate, schema: &FieldSchema) -> NormalizedDelta {
    let mut entries = BTreeMap::new();

    for (key, raw) in candidate.iter() {
        let spec = match schema.spec_for(key) {
            Some(spec) => spec,
            None => continue,
        };

        let raw = match raw {
            Some(raw) => raw.trim(),
            None => continue,
        };
        if raw.is_empty() || is_placeholder(raw) {
            continue;
        }
        if !spec.format.matches(raw) {
            continue;
        }

        if let Ok(value) = FieldValue::new(raw) {
            entries.insert(spec.id.clone(), value);
        }
    }

    NormalizedDelta::from_entries(entries)
}

/// Checks a trimmed value against the placeholder token set.
fn is_placeholder(value: &str) -> bool {
    PLACEHOLDER_TOKENS
        .iter()
        .any(|token| value.eq_ignore_ascii_case(token))
}
