//! Extractor ports - interfaces for turning raw evidence into field candidates.
//!
//! Two variants share one output contract: the conversation extractor reads
//! a bounded dialogue window, the document extractor reads an image. Both
//! are external collaborators; the engine depends only on the shape of what
//! they return and treats any failure as "no new evidence", never as a
//! fatal case error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::case::{ExtractionCandidate, KnownData, Turn};
use crate::domain::schema::{FieldSchema, ServiceContext};

/// Port for dialogue-driven field extraction.
///
/// Implementations receive the most recent transcript window (bounded by
/// the caller), the data already confirmed, and the active service context,
/// and return candidate values plus a natural-language reply.
#[async_trait]
pub trait ConversationExtractor: Send + Sync {
    /// Extracts candidate field values from recent dialogue.
    async fn extract(
        &self,
        window: &[Turn],
        known: &KnownData,
        context: &ServiceContext,
    ) -> Result<ConversationExtraction, ExtractorError>;
}

/// Port for document-image field extraction.
///
/// Implementations must favour precision over recall: fields not visually
/// present in the image are to be returned as null, never guessed. The
/// engine cannot verify this; normalization catches whatever placeholder
/// text slips through.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    /// Extracts candidate field values from a document image.
    async fn extract(
        &self,
        image: &ImageEvidence,
        schema: &FieldSchema,
    ) -> Result<ExtractionCandidate, ExtractorError>;
}

/// Result of a conversational extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationExtraction {
    /// Raw candidate field values (unvalidated).
    pub candidate: ExtractionCandidate,
    /// Natural-language reply to show the user.
    pub message: Option<String>,
    /// Whether the extractor believes the form is done. Advisory only; the
    /// engine never locks a case based on this signal.
    pub signal: ContinuationSignal,
}

impl ConversationExtraction {
    /// Creates an extraction carrying only a reply message.
    pub fn reply(message: impl Into<String>) -> Self {
        Self {
            candidate: ExtractionCandidate::new(),
            message: Some(message.into()),
            signal: ContinuationSignal::Continue,
        }
    }

    /// Sets the candidate.
    pub fn with_candidate(mut self, candidate: ExtractionCandidate) -> Self {
        self.candidate = candidate;
        self
    }

    /// Sets the continuation signal.
    pub fn with_signal(mut self, signal: ContinuationSignal) -> Self {
        self.signal = signal;
        self
    }
}

/// Extractor's advisory view of whether more dialogue is needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContinuationSignal {
    /// More fields are missing; keep the conversation going.
    #[default]
    Continue,
    /// The extractor believes every field is collected.
    Done,
}

/// Image evidence submitted for document extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEvidence {
    /// Raw image bytes.
    pub bytes: Vec<u8>,
    /// MIME type, e.g. `image/jpeg`.
    pub media_type: String,
}

impl ImageEvidence {
    /// Creates image evidence with an explicit MIME type.
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
        }
    }

    /// Creates JPEG evidence.
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "image/jpeg")
    }

    /// Creates PNG evidence.
    pub fn png(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "image/png")
    }
}

/// Extractor errors.
///
/// All of these narrow to "this action produced no progress": callers
/// substitute an empty candidate and inform the user.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExtractorError {
    /// Rate limited by the extraction service.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Extraction service is unavailable.
    #[error("extraction service unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// Response was not in the expected shape.
    #[error("malformed extractor response: {0}")]
    Parse(String),

    /// Request was rejected as invalid.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ExtractorError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExtractorError::RateLimited { .. }
                | ExtractorError::Unavailable { .. }
                | ExtractorError::Network(_)
                | ExtractorError::Timeout { .. }
        )
    }
}
