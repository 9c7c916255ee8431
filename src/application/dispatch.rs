//! Case event dispatch.
//!
//! Every user action is an explicit [`CaseEvent`] consumed by one dispatch
//! function, which runs the components in a fixed order (extractor →
//! normalize → merge → status recompute). One event, one pipeline run;
//! sessions are caller-owned and never shared across cases.

use std::sync::Arc;

use crate::domain::case::{CaseSession, CompletionStatus};
use crate::domain::schema::{ServiceId, ServiceRegistry};
use crate::ports::{
    ContinuationSignal, ConversationExtractor, DocumentExtractor, DocumentRenderer,
    ImageEvidence, RenderError, RenderedDocument,
};

use super::handlers::{RenderDocumentHandler, SendMessageHandler, SubmitDocumentHandler};

/// One user action against a case.
#[derive(Debug, Clone)]
pub enum CaseEvent {
    /// The user typed a chat message.
    UserMessage(String),
    /// The user submitted a document image.
    DocumentSubmitted(ImageEvidence),
    /// The user asked to start the case over.
    ResetRequested,
    /// The user selected a different service.
    ServiceSwitched(ServiceId),
    /// The user asked for the filled document.
    RenderRequested {
        /// File name for the produced document.
        output_name: String,
    },
}

/// Result of dispatching one event.
#[derive(Debug, Clone)]
pub struct EventOutcome {
    /// Assistant reply recorded in the transcript, if the event produced one.
    pub reply: Option<String>,
    /// Fresh completion status after the event.
    pub status: CompletionStatus,
    /// Advisory continuation signal, for events that ran the conversation
    /// extractor.
    pub signal: Option<ContinuationSignal>,
    /// The produced document, for render events.
    pub rendered: Option<RenderedDocument>,
}

/// Dispatch errors.
///
/// Extraction failures are deliberately absent: they are recovered inside
/// the handlers as "no new evidence" and never abort an event.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The requested service is not registered.
    #[error("unknown service: {0}")]
    UnknownService(ServiceId),

    /// Document rendering failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Routes case events through the extraction pipeline.
pub struct Dispatcher {
    send_message: SendMessageHandler,
    submit_document: SubmitDocumentHandler,
    render_document: RenderDocumentHandler,
    registry: &'static ServiceRegistry,
}

impl Dispatcher {
    /// Creates a dispatcher over the given collaborators.
    pub fn new(
        conversation: Arc<dyn ConversationExtractor>,
        document: Arc<dyn DocumentExtractor>,
        renderer: Arc<dyn DocumentRenderer>,
        registry: &'static ServiceRegistry,
    ) -> Self {
        Self {
            send_message: SendMessageHandler::new(conversation),
            submit_document: SubmitDocumentHandler::new(document),
            render_document: RenderDocumentHandler::new(renderer),
            registry,
        }
    }

    /// Processes one event against the session.
    pub async fn dispatch(
        &self,
        session: &mut CaseSession,
        event: CaseEvent,
    ) -> Result<EventOutcome, DispatchError> {
        let outcome = match event {
            CaseEvent::UserMessage(text) => {
                let out = self.send_message.handle(session, &text).await;
                EventOutcome {
                    reply: Some(out.reply),
                    status: out.status,
                    signal: Some(out.signal),
                    rendered: None,
                }
            }
            CaseEvent::DocumentSubmitted(image) => {
                let out = self.submit_document.handle(session, &image).await;
                EventOutcome {
                    reply: Some(out.reply),
                    status: out.status,
                    signal: None,
                    rendered: None,
                }
            }
            CaseEvent::ResetRequested => {
                session.reset();
                EventOutcome {
                    reply: latest_turn_text(session),
                    status: session.completion_status(),
                    signal: None,
                    rendered: None,
                }
            }
            CaseEvent::ServiceSwitched(service_id) => {
                let context = self
                    .registry
                    .get(&service_id)
                    .ok_or_else(|| DispatchError::UnknownService(service_id.clone()))?
                    .clone();
                session.switch_service(context);
                EventOutcome {
                    reply: latest_turn_text(session),
                    status: session.completion_status(),
                    signal: None,
                    rendered: None,
                }
            }
            CaseEvent::RenderRequested { output_name } => {
                let rendered = self.render_document.handle(session, &output_name)?;
                EventOutcome {
                    reply: None,
                    status: session.completion_status(),
                    signal: None,
                    rendered: Some(rendered),
                }
            }
        };

        if outcome.status.total == 0 {
            tracing::warn!(
                service = %session.context().id,
                "active schema declares no fields; case reported complete"
            );
        }

        Ok(outcome)
    }
}

/// The most recent transcript turn, used to echo greetings after resets.
fn latest_turn_text(session: &CaseSession) -> Option<String> {
    session
        .transcript()
        .turns()
        .last()
        .map(|turn| turn.text.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{
        MarkdownFormRenderer, MockConversationExtractor, MockDocumentExtractor,
    };
    use crate::domain::case::{ExtractionCandidate, KnownData};
    use crate::domain::schema::{registry, FieldId, ServiceContext};

    fn dispatcher_with(
        conversation: MockConversationExtractor,
        document: MockDocumentExtractor,
        renderer: Arc<dyn DocumentRenderer>,
    ) -> Dispatcher {
        Dispatcher::new(
            Arc::new(conversation),
            Arc::new(document),
            renderer,
            registry(),
        )
    }

    fn tmp_renderer(dir: &tempfile::TempDir) -> Arc<dyn DocumentRenderer> {
        Arc::new(MarkdownFormRenderer::new(dir.path()))
    }

    fn session() -> CaseSession {
        CaseSession::new(registry().default_service().unwrap().clone())
    }

    #[tokio::test]
    async fn user_message_runs_full_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let conversation = MockConversationExtractor::new().with_reply(
            ExtractionCandidate::new().with("LastName", "Popescu"),
            "Got it.",
        );
        let dispatcher =
            dispatcher_with(conversation, MockDocumentExtractor::new(), tmp_renderer(&dir));
        let mut session = session();

        let outcome = dispatcher
            .dispatch(&mut session, CaseEvent::UserMessage("Popescu here".to_string()))
            .await
            .unwrap();

        assert_eq!(outcome.reply.as_deref(), Some("Got it."));
        assert_eq!(outcome.status.filled, 1);
        assert_eq!(outcome.signal, Some(ContinuationSignal::Continue));
    }

    #[tokio::test]
    async fn reset_event_reseeds_greeting() {
        let dir = tempfile::tempdir().unwrap();
        let conversation = MockConversationExtractor::new()
            .with_reply(ExtractionCandidate::new().with("FirstName", "Ion"), "Hi");
        let dispatcher =
            dispatcher_with(conversation, MockDocumentExtractor::new(), tmp_renderer(&dir));
        let mut session = session();

        dispatcher
            .dispatch(&mut session, CaseEvent::UserMessage("I am Ion".to_string()))
            .await
            .unwrap();
        assert_eq!(session.known_data().len(), 1);

        let outcome = dispatcher
            .dispatch(&mut session, CaseEvent::ResetRequested)
            .await
            .unwrap();

        assert!(session.known_data().is_empty());
        assert_eq!(session.transcript().len(), 1);
        assert!(outcome.reply.unwrap().contains("Identity Card"));
    }

    #[tokio::test]
    async fn unknown_service_is_an_error_and_leaves_session_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let conversation = MockConversationExtractor::new()
            .with_reply(ExtractionCandidate::new().with("LastName", "Pop"), "Ok");
        let dispatcher =
            dispatcher_with(conversation, MockDocumentExtractor::new(), tmp_renderer(&dir));
        let mut session = session();

        dispatcher
            .dispatch(&mut session, CaseEvent::UserMessage("Pop".to_string()))
            .await
            .unwrap();

        let result = dispatcher
            .dispatch(
                &mut session,
                CaseEvent::ServiceSwitched(ServiceId::new("dog_license")),
            )
            .await;

        assert!(matches!(result, Err(DispatchError::UnknownService(_))));
        assert_eq!(session.known_data().len(), 1);
        assert_eq!(session.context().id.as_str(), "identity_card");
    }

    #[tokio::test]
    async fn service_switch_resets_and_greets_for_new_service() {
        let dir = tempfile::tempdir().unwrap();
        let conversation = MockConversationExtractor::new()
            .with_reply(ExtractionCandidate::new().with("LastName", "Pop"), "Ok");
        let dispatcher =
            dispatcher_with(conversation, MockDocumentExtractor::new(), tmp_renderer(&dir));
        let mut session = session();

        dispatcher
            .dispatch(&mut session, CaseEvent::UserMessage("Pop".to_string()))
            .await
            .unwrap();

        let outcome = dispatcher
            .dispatch(
                &mut session,
                CaseEvent::ServiceSwitched(ServiceId::new("passport_renewal")),
            )
            .await
            .unwrap();

        assert!(session.known_data().is_empty());
        assert_eq!(session.context().id.as_str(), "passport_renewal");
        assert!(outcome.reply.unwrap().contains("Passport Renewal"));
        assert_eq!(outcome.status.total, 6);
    }

    #[tokio::test]
    async fn render_event_produces_document_without_touching_state() {
        let dir = tempfile::tempdir().unwrap();
        let dispatcher = dispatcher_with(
            MockConversationExtractor::new(),
            MockDocumentExtractor::new(),
            tmp_renderer(&dir),
        );
        let mut session = session();
        let turns_before = session.transcript().len();

        let outcome = dispatcher
            .dispatch(
                &mut session,
                CaseEvent::RenderRequested {
                    output_name: "Application.md".to_string(),
                },
            )
            .await
            .unwrap();

        assert!(outcome.rendered.unwrap().path.exists());
        assert_eq!(session.transcript().len(), turns_before);
    }

    #[tokio::test]
    async fn render_failure_surfaces_error_and_preserves_data() {
        struct BrokenRenderer;
        impl DocumentRenderer for BrokenRenderer {
            fn render(
                &self,
                _data: &KnownData,
                _context: &ServiceContext,
                _output_name: &str,
            ) -> Result<RenderedDocument, RenderError> {
                Err(RenderError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk full",
                )))
            }
        }

        let conversation = MockConversationExtractor::new()
            .with_reply(ExtractionCandidate::new().with("FirstName", "Ion"), "Ok");
        let dispatcher = dispatcher_with(
            conversation,
            MockDocumentExtractor::new(),
            Arc::new(BrokenRenderer),
        );
        let mut session = session();

        dispatcher
            .dispatch(&mut session, CaseEvent::UserMessage("Ion".to_string()))
            .await
            .unwrap();

        let result = dispatcher
            .dispatch(
                &mut session,
                CaseEvent::RenderRequested {
                    output_name: "Application.md".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(DispatchError::Render(_))));
        assert!(session.known_data().contains(&FieldId::new("FirstName")));
    }

    #[tokio::test]
    async fn document_event_merges_scan_results() {
        let dir = tempfile::tempdir().unwrap();
        let document = MockDocumentExtractor::new().with_candidate(
            ExtractionCandidate::new().with("CNP", "1960101223344"),
        );
        let dispatcher =
            dispatcher_with(MockConversationExtractor::new(), document, tmp_renderer(&dir));
        let mut session = session();

        let outcome = dispatcher
            .dispatch(
                &mut session,
                CaseEvent::DocumentSubmitted(ImageEvidence::jpeg(vec![1, 2, 3])),
            )
            .await
            .unwrap();

        assert_eq!(outcome.status.filled, 1);
        assert!(session.known_data().contains(&FieldId::new("CNP")));
    }
}
