//! Completion progress report.

use serde::{Deserialize, Serialize};

use crate::domain::schema::FieldId;

/// Snapshot of case progress, recomputed fresh on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionStatus {
    /// Number of schema fields holding a validated value.
    pub filled: usize,
    /// Total number of schema fields.
    pub total: usize,
    /// Unfilled fields in schema-declared order.
    pub missing: Vec<FieldId>,
}

impl CompletionStatus {
    /// Returns true when every required field is filled.
    ///
    /// A zero-field schema reports complete; there is nothing left to
    /// collect, degenerate as the configuration may be.
    pub fn is_complete(&self) -> bool {
        self.filled >= self.total
    }

    /// Completion ratio in `[0.0, 1.0]`, safe for a zero-field schema.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            (self.filled as f64 / self.total as f64).min(1.0)
        }
    }
}
