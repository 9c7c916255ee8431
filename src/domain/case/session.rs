//! Case session aggregate - the single source of truth for case progress.
//!
//! One session covers one user's attempt to complete one service's form.
//! Sessions are explicit, caller-owned objects with lifecycle
//! create-on-start / reset-on-service-switch / discard-on-end; there is no
//! process-wide shared case state.

use serde::{Deserialize, Serialize};

use super::candidate::NormalizedDelta;
use super::known_data::KnownData;
use super::status::CompletionStatus;
use super::transcript::{Transcript, TurnRole};
use crate::domain::foundation::CaseId;
use crate::domain::schema::ServiceContext;

/// Session-scoped case state: active service, known data, and transcript.
///
/// # Invariants
///
/// - `known` ⊆ active schema key set at all times. Holds by construction:
///   the only merge path accepts [`NormalizedDelta`] values, which are
///   schema-scoped, and every context change clears known data.
/// - The transcript is never empty after construction; resets reseed a
///   greeting turn immediately after clearing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseSession {
    id: CaseId,
    context: ServiceContext,
    known: KnownData,
    transcript: Transcript,
}

impl CaseSession {
    /// Opens a new case for the given service, seeding the greeting.
    pub fn new(context: ServiceContext) -> Self {
        let mut session = Self {
            id: CaseId::new(),
            context,
            known: KnownData::new(),
            transcript: Transcript::new(),
        };
        session.seed_greeting();
        session
    }

    /// Returns the case id.
    pub fn id(&self) -> &CaseId {
        &self.id
    }

    /// Returns the active service context.
    pub fn context(&self) -> &ServiceContext {
        &self.context
    }

    /// Returns the accumulated known data.
    pub fn known_data(&self) -> &KnownData {
        &self.known
    }

    /// Returns the dialogue transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Merges a normalized delta with last-write-wins per key.
    ///
    /// Does not touch the transcript; recording the turns that triggered the
    /// extraction is the caller's responsibility, since only the caller
    /// knows the surrounding dialogue.
    pub fn apply_extraction(&mut self, delta: NormalizedDelta) {
        self.known.merge(delta);
    }

    /// Appends a dialogue turn.
    pub fn record_turn(&mut self, role: TurnRole, text: impl Into<String>) {
        self.transcript.push(role, text);
    }

    /// Reports completion progress against the active schema.
    ///
    /// Recomputed fresh on every call; nothing is cached. `missing` lists
    /// unfilled fields in schema-declared order. A zero-field schema reports
    /// complete rather than failing.
    pub fn completion_status(&self) -> CompletionStatus {
        let schema = &self.context.schema;
        let missing: Vec<_> = schema
            .field_ids()
            .filter(|id| !self.known.contains(id))
            .cloned()
            .collect();

        CompletionStatus {
            filled: schema.len() - missing.len(),
            total: schema.len(),
            missing,
        }
    }

    /// Clears known data and transcript, then reseeds the greeting.
    ///
    /// The only operation that leaves a non-empty transcript as a side
    /// effect of clearing it, so a case is never left with zero turns.
    pub fn reset(&mut self) {
        self.known.clear();
        self.transcript.clear();
        self.seed_greeting();
    }

    /// Replaces the active service and unconditionally resets.
    ///
    /// No carry-over of known data across services is permitted, even for
    /// identically named fields and even when switching back to the same
    /// service; cross-service data leakage is treated as a correctness bug.
    pub fn switch_service(&mut self, new_context: ServiceContext) {
        self.context = new_context;
        self.reset();
    }

    fn seed_greeting(&mut self) {
        let greeting = format!(
            "Hello. I am the assistant for **{}**. Please provide the details to begin.",
            self.context.name
        );
        self.record_turn(TurnRole::Assistant, greeting);
    }
}
