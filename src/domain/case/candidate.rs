//! Raw extractor output and its validated counterpart.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::value::FieldValue;
use crate::domain::schema::FieldId;

/// Untrusted key → value mapping produced by an extractor.
///
/// Values may be null, placeholder text, or keyed outside the active schema.
/// Nothing here is validated; candidates must pass through
/// [`normalize`](super::normalize) before they can reach case state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractionCandidate {
    entries: HashMap<String, Option<String>>,
}

impl ExtractionCandidate {
    /// Creates an empty candidate (the "no new evidence" result).
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a raw entry.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        self.entries.insert(key.into(), value);
    }

    /// Builder-style insert for tests and mocks.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, Some(value.into()));
        self
    }

    /// Builder-style null entry.
    pub fn with_null(mut self, key: impl Into<String>) -> Self {
        self.insert(key, None);
        self
    }

    /// Iterates raw entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Option<String>)> {
        self.entries.iter()
    }

    /// Returns true if the candidate carries no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of raw entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl FromIterator<(String, Option<String>)> for ExtractionCandidate {
    fn from_iter<I: IntoIterator<Item = (String, Option<String>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Schema-scoped, placeholder-free delta ready to merge into case state.
///
/// Only [`normalize`](super::normalize) produces non-empty deltas, which
/// makes "normalization runs upstream of the merge" a property of the type
/// system rather than a documented convention.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedDelta {
    entries: BTreeMap<FieldId, FieldValue>,
}

impl NormalizedDelta {
    /// Creates an empty delta (the substitute for a failed extraction).
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_entries(entries: BTreeMap<FieldId, FieldValue>) -> Self {
        Self { entries }
    }

    pub(crate) fn into_entries(self) -> impl Iterator<Item = (FieldId, FieldValue)> {
        self.entries.into_iter()
    }

    /// Looks up a normalized value.
    pub fn get(&self, id: &FieldId) -> Option<&FieldValue> {
        self.entries.get(id)
    }

    /// Returns true if the delta names this field.
    pub fn contains(&self, id: &FieldId) -> bool {
        self.entries.contains_key(id)
    }

    /// Iterates normalized entries.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldId, &FieldValue)> {
        self.entries.iter()
    }

    /// Returns the number of normalized entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing survived normalization.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<NormalizedDelta> for ExtractionCandidate {
    /// Re-wraps a clean delta as a candidate, e.g. to feed normalization a
    /// second time when checking idempotence.
    fn from(delta: NormalizedDelta) -> Self {
        delta
            .into_entries()
            .map(|(id, value)| {
                (
                    id.as_str().to_string(),
                    Some(value.as_str().to_string()),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_deserializes_from_extractor_json() {
        let json = r#"{"FirstName": "Ion", "CNP": null}"#;
        let candidate: ExtractionCandidate = serde_json::from_str(json).unwrap();

        assert_eq!(candidate.len(), 2);
        let cnp = candidate
            .iter()
            .find(|(key, _)| key.as_str() == "CNP")
            .unwrap();
        assert!(cnp.1.is_none());
    }

    #[test]
    fn builder_inserts_entries() {
        let candidate = ExtractionCandidate::new()
            .with("FirstName", "Ion")
            .with_null("CNP");

        assert_eq!(candidate.len(), 2);
    }

    #[test]
    fn empty_delta_is_empty() {
        assert!(NormalizedDelta::empty().is_empty());
        assert_eq!(NormalizedDelta::empty().len(), 0);
    }
}
