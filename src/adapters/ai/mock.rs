//! Mock extractors for testing.
//!
//! Configurable implementations of both extractor ports, allowing tests to
//! run without calling a real language-model API.
//!
//! # Features
//!
//! - Queued scripted responses (consumed in order)
//! - Error injection for failure-isolation testing
//! - Call recording for verification (e.g. window bounding)

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::case::{ExtractionCandidate, KnownData, Turn};
use crate::domain::schema::{FieldSchema, ServiceContext};
use crate::ports::{
    ConversationExtraction, ConversationExtractor, DocumentExtractor, ExtractorError,
    ImageEvidence,
};

/// One recorded conversational extraction call.
#[derive(Debug, Clone)]
pub struct RecordedConversationCall {
    /// The transcript window the caller passed in.
    pub window: Vec<Turn>,
    /// Snapshot of the known data at call time.
    pub known: KnownData,
}

/// Mock conversation extractor with queued responses.
#[derive(Debug, Clone, Default)]
pub struct MockConversationExtractor {
    replies: Arc<Mutex<VecDeque<Result<ConversationExtraction, ExtractorError>>>>,
    calls: Arc<Mutex<Vec<RecordedConversationCall>>>,
}

impl MockConversationExtractor {
    /// Creates a mock with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a full extraction result.
    pub fn with_extraction(self, extraction: ConversationExtraction) -> Self {
        self.replies.lock().unwrap().push_back(Ok(extraction));
        self
    }

    /// Queues a reply carrying a candidate and a message.
    pub fn with_reply(self, candidate: ExtractionCandidate, message: impl Into<String>) -> Self {
        self.with_extraction(ConversationExtraction::reply(message).with_candidate(candidate))
    }

    /// Queues an error.
    pub fn with_error(self, error: ExtractorError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    /// Returns the number of calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded calls.
    pub fn calls(&self) -> Vec<RecordedConversationCall> {
        self.calls.lock().unwrap().clone()
    }

    fn next_reply(&self) -> Result<ConversationExtraction, ExtractorError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ConversationExtraction::reply("Understood.")))
    }
}

#[async_trait]
impl ConversationExtractor for MockConversationExtractor {
    async fn extract(
        &self,
        window: &[Turn],
        known: &KnownData,
        _context: &ServiceContext,
    ) -> Result<ConversationExtraction, ExtractorError> {
        self.calls.lock().unwrap().push(RecordedConversationCall {
            window: window.to_vec(),
            known: known.clone(),
        });
        self.next_reply()
    }
}

/// Mock document extractor with queued responses.
#[derive(Debug, Clone, Default)]
pub struct MockDocumentExtractor {
    replies: Arc<Mutex<VecDeque<Result<ExtractionCandidate, ExtractorError>>>>,
    calls: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockDocumentExtractor {
    /// Creates a mock with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a candidate result.
    pub fn with_candidate(self, candidate: ExtractionCandidate) -> Self {
        self.replies.lock().unwrap().push_back(Ok(candidate));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: ExtractorError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    /// Returns the number of calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn next_reply(&self) -> Result<ExtractionCandidate, ExtractorError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ExtractionCandidate::new()))
    }
}

#[async_trait]
impl DocumentExtractor for MockDocumentExtractor {
    async fn extract(
        &self,
        image: &ImageEvidence,
        _schema: &FieldSchema,
    ) -> Result<ExtractionCandidate, ExtractorError> {
        self.calls.lock().unwrap().push(image.bytes.clone());
        self.next_reply()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{registry, ServiceId};
    use crate::ports::ContinuationSignal;

    fn context() -> ServiceContext {
        registry()
            .get(&ServiceId::new("identity_card"))
            .unwrap()
            .clone()
    }

    #[tokio::test]
    async fn replies_are_consumed_in_order() {
        let mock = MockConversationExtractor::new()
            .with_reply(ExtractionCandidate::new(), "first")
            .with_reply(ExtractionCandidate::new(), "second");

        let known = KnownData::new();
        let ctx = context();
        let a = mock.extract(&[], &known, &ctx).await.unwrap();
        let b = mock.extract(&[], &known, &ctx).await.unwrap();

        assert_eq!(a.message.as_deref(), Some("first"));
        assert_eq!(b.message.as_deref(), Some("second"));
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn exhausted_queue_falls_back_to_default_reply() {
        let mock = MockConversationExtractor::new();
        let result = mock.extract(&[], &KnownData::new(), &context()).await.unwrap();

        assert!(result.candidate.is_empty());
        assert_eq!(result.signal, ContinuationSignal::Continue);
    }

    #[tokio::test]
    async fn queued_errors_are_returned() {
        let mock = MockConversationExtractor::new()
            .with_error(ExtractorError::Timeout { timeout_secs: 30 });

        let result = mock.extract(&[], &KnownData::new(), &context()).await;
        assert!(matches!(result, Err(ExtractorError::Timeout { .. })));
    }

    #[tokio::test]
    async fn document_mock_records_calls() {
        let mock = MockDocumentExtractor::new()
            .with_candidate(ExtractionCandidate::new().with("FirstName", "Ion"));

        let image = ImageEvidence::jpeg(vec![0xFF, 0xD8]);
        let candidate = mock.extract(&image, &context().schema).await.unwrap();

        assert_eq!(candidate.len(), 1);
        assert_eq!(mock.call_count(), 1);
    }
}
