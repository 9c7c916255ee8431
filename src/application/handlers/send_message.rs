//! SendMessageHandler - run one user message through the extraction pipeline.
//!
//! Fixed order: record the user turn, call the conversation extractor with
//! the bounded transcript window, normalize, merge, record the assistant
//! reply. Extractor failure is not an error here: it narrows to "no new
//! evidence" plus one informational assistant turn, and the user retries.

use std::sync::Arc;

use crate::domain::case::{
    normalize, CaseSession, CompletionStatus, Turn, TurnRole, CONTEXT_WINDOW_TURNS,
};
use crate::ports::{ContinuationSignal, ConversationExtractor};

/// Fallback reply when the extractor returns no message.
const DEFAULT_REPLY: &str = "I didn't quite catch that. Could you rephrase?";

/// Result of processing one user message.
#[derive(Debug, Clone)]
pub struct MessageOutcome {
    /// Assistant reply recorded in the transcript.
    pub reply: String,
    /// Fresh completion status after the merge.
    pub status: CompletionStatus,
    /// Extractor's advisory continuation signal.
    pub signal: ContinuationSignal,
    /// Number of fields the merge added or overwrote.
    pub fields_merged: usize,
}

/// Handler for user chat messages.
pub struct SendMessageHandler {
    extractor: Arc<dyn ConversationExtractor>,
}

impl SendMessageHandler {
    pub fn new(extractor: Arc<dyn ConversationExtractor>) -> Self {
        Self { extractor }
    }

    /// Processes one user message against the session.
    pub async fn handle(&self, session: &mut CaseSession, text: &str) -> MessageOutcome {
        session.record_turn(TurnRole::User, text);

        let window: Vec<Turn> = session
            .transcript()
            .recent_window(CONTEXT_WINDOW_TURNS)
            .to_vec();

        let (reply, signal, fields_merged) = match self
            .extractor
            .extract(&window, session.known_data(), session.context())
            .await
        {
            Ok(extraction) => {
                let delta = normalize(&extraction.candidate, &session.context().schema);
                let merged = delta.len();
                session.apply_extraction(delta);

                tracing::info!(
                    case = %session.id(),
                    fields = merged,
                    "conversation extraction merged"
                );
                (
                    extraction.message.unwrap_or_else(|| DEFAULT_REPLY.to_string()),
                    extraction.signal,
                    merged,
                )
            }
            Err(err) => {
                tracing::warn!(case = %session.id(), error = %err, "conversation extraction failed");
                (
                    format!(
                        "I ran into a problem reading your message ({}). \
                         Nothing was saved; please try again.",
                        err
                    ),
                    ContinuationSignal::Continue,
                    0,
                )
            }
        };

        session.record_turn(TurnRole::Assistant, reply.clone());

        MessageOutcome {
            reply,
            status: session.completion_status(),
            signal,
            fields_merged,
        }
    }
}
