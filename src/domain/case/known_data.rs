//! Accumulated, validated field values for the current case.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::candidate::NormalizedDelta;
use super::value::FieldValue;
use crate::domain::schema::FieldId;

/// Mapping from field identifier to validated value.
///
/// # Invariants
///
/// - Every key belongs to the active schema's key set. This holds by
///   construction: the only mutation path is [`KnownData::merge`], which
///   accepts a [`NormalizedDelta`], and deltas are only produced by
///   normalization against the active schema.
/// - No value is empty or a placeholder token (guaranteed by [`FieldValue`]
///   plus normalization).
///
/// Owned exclusively by the case session; no other component mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownData {
    entries: BTreeMap<FieldId, FieldValue>,
}

impl KnownData {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a normalized delta with last-write-wins per key.
    ///
    /// A new value for a key already present overwrites the prior value;
    /// keys absent from the delta are left untouched. The merge is additive,
    /// never subtractive: a field already confirmed is never erased by a
    /// later extraction that does not mention it.
    pub fn merge(&mut self, delta: NormalizedDelta) {
        for (id, value) in delta.into_entries() {
            self.entries.insert(id, value);
        }
    }

    /// Looks up the value for a field.
    pub fn get(&self, id: &FieldId) -> Option<&FieldValue> {
        self.entries.get(id)
    }

    /// Returns true if the field holds a value.
    pub fn contains(&self, id: &FieldId) -> bool {
        self.entries.contains_key(id)
    }

    /// Returns the number of filled fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no fields are filled.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the filled entries.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldId, &FieldValue)> {
        self.entries.iter()
    }

    /// Discards all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the entries as a JSON object (for extractor prompts).
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (id, value) in &self.entries {
            map.insert(
                id.as_str().to_string(),
                serde_json::Value::String(value.as_str().to_string()),
            );
        }
        serde_json::Value::Object(map)
    }
}
