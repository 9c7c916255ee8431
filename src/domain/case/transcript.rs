//! Dialogue transcript for a case.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Number of most-recent turns passed to a conversation extractor.
///
/// Older turns remain in the transcript for display but are not considered
/// extraction context, bounding extractor input size.
pub const CONTEXT_WINDOW_TURNS: usize = 10;

/// Who produced a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The person completing the form.
    User,
    /// The assistant.
    Assistant,
}

/// One turn of dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who spoke.
    pub role: TurnRole,
    /// What was said.
    pub text: String,
    /// When the turn was recorded.
    pub at: Timestamp,
}

impl Turn {
    /// Creates a turn stamped with the current time.
    pub fn new(role: TurnRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            at: Timestamp::now(),
        }
    }
}

/// Append-only ordered sequence of dialogue turns.
///
/// Cleared only as part of a case reset, which immediately reseeds the
/// greeting, so a live case never has zero turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn.
    pub fn push(&mut self, role: TurnRole, text: impl Into<String>) {
        self.turns.push(Turn::new(role, text));
    }

    /// Returns all turns in order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the last `n` turns (or all of them, if fewer exist).
    pub fn recent_window(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// Returns the number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns true if no turns have been recorded.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Discards all turns.
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}
