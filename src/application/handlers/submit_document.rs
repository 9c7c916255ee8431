//! SubmitDocumentHandler - run one document image through the extraction
//! pipeline.
//!
//! Same fixed order as chat messages, minus the user turn: the image is not
//! dialogue. The assistant summarizes what was read (or that nothing was)
//! as a single transcript turn.

use std::sync::Arc;

use crate::domain::case::{normalize, CaseSession, CompletionStatus, TurnRole};
use crate::ports::{DocumentExtractor, ImageEvidence};

/// Result of processing one submitted document image.
#[derive(Debug, Clone)]
pub struct DocumentOutcome {
    /// Assistant summary recorded in the transcript.
    pub reply: String,
    /// Fresh completion status after the merge.
    pub status: CompletionStatus,
    /// Number of fields the merge added or overwrote.
    pub fields_merged: usize,
}

/// Handler for submitted document images.
pub struct SubmitDocumentHandler {
    extractor: Arc<dyn DocumentExtractor>,
}

impl SubmitDocumentHandler {
    pub fn new(extractor: Arc<dyn DocumentExtractor>) -> Self {
        Self { extractor }
    }

    /// Processes one document image against the session.
    pub async fn handle(
        &self,
        session: &mut CaseSession,
        image: &ImageEvidence,
    ) -> DocumentOutcome {
        let (reply, fields_merged) = match self
            .extractor
            .extract(image, &session.context().schema)
            .await
        {
            Ok(candidate) => {
                let delta = normalize(&candidate, &session.context().schema);
                let labels: Vec<String> = delta
                    .iter()
                    .filter_map(|(id, _)| {
                        session
                            .context()
                            .schema
                            .spec_for(id.as_str())
                            .map(|spec| spec.label.clone())
                    })
                    .collect();
                let merged = delta.len();
                session.apply_extraction(delta);

                tracing::info!(
                    case = %session.id(),
                    fields = merged,
                    "document extraction merged"
                );
                let reply = if merged > 0 {
                    format!("I read {} field(s) from your document: {}.", merged, labels.join(", "))
                } else {
                    "I could not read any of the required fields from that document. \
                     You can try a clearer photo or continue in chat."
                        .to_string()
                };
                (reply, merged)
            }
            Err(err) => {
                tracing::warn!(case = %session.id(), error = %err, "document extraction failed");
                (
                    format!(
                        "I ran into a problem scanning your document ({}). \
                         Nothing was saved; please try again.",
                        err
                    ),
                    0,
                )
            }
        };

        session.record_turn(TurnRole::Assistant, reply.clone());

        DocumentOutcome {
            reply,
            status: session.completion_status(),
            fields_merged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockDocumentExtractor;
    use crate::domain::case::ExtractionCandidate;
    use crate::domain::schema::{registry, FieldId, ServiceId};
    use crate::ports::ExtractorError;

    fn session() -> CaseSession {
        CaseSession::new(
            registry()
                .get(&ServiceId::new("identity_card"))
                .unwrap()
                .clone(),
        )
    }

    fn image() -> ImageEvidence {
        ImageEvidence::jpeg(vec![0xFF, 0xD8, 0xFF])
    }

    #[tokio::test]
    async fn merges_readable_fields_and_summarizes() {
        let mock = MockDocumentExtractor::new().with_candidate(
            ExtractionCandidate::new()
                .with("LastName", "Popescu")
                .with("CNP", "1960101223344")
                .with_null("City"),
        );
        let handler = SubmitDocumentHandler::new(Arc::new(mock));
        let mut session = session();

        let outcome = handler.handle(&mut session, &image()).await;

        assert_eq!(outcome.fields_merged, 2);
        assert!(outcome.reply.contains("2 field(s)"));
        assert!(outcome.reply.contains("Family Name"));
        assert!(session.known_data().contains(&FieldId::new("CNP")));
        assert!(!session.known_data().contains(&FieldId::new("City")));
    }

    #[tokio::test]
    async fn unreadable_document_reports_nothing_saved() {
        let mock = MockDocumentExtractor::new()
            .with_candidate(ExtractionCandidate::new().with_null("LastName"));
        let handler = SubmitDocumentHandler::new(Arc::new(mock));
        let mut session = session();

        let outcome = handler.handle(&mut session, &image()).await;

        assert_eq!(outcome.fields_merged, 0);
        assert!(outcome.reply.contains("could not read"));
        assert!(session.known_data().is_empty());
    }

    #[tokio::test]
    async fn extractor_failure_appends_one_assistant_turn() {
        let mock = MockDocumentExtractor::new()
            .with_error(ExtractorError::unavailable("503"));
        let handler = SubmitDocumentHandler::new(Arc::new(mock));
        let mut session = session();
        let turns_before = session.transcript().len();

        let outcome = handler.handle(&mut session, &image()).await;

        assert!(session.known_data().is_empty());
        assert_eq!(outcome.fields_merged, 0);
        assert_eq!(session.transcript().len(), turns_before + 1);
        assert_eq!(
            session.transcript().turns().last().unwrap().role,
            TurnRole::Assistant
        );
    }

    #[tokio::test]
    async fn guessed_placeholders_do_not_reach_known_data() {
        let mock = MockDocumentExtractor::new().with_candidate(
            ExtractionCandidate::new()
                .with("LastName", "not provided")
                .with("FirstName", "Ion"),
        );
        let handler = SubmitDocumentHandler::new(Arc::new(mock));
        let mut session = session();

        handler.handle(&mut session, &image()).await;

        assert!(!session.known_data().contains(&FieldId::new("LastName")));
        assert!(session.known_data().contains(&FieldId::new("FirstName")));
    }
}
