//! RenderDocumentHandler - produce a filled document on explicit request.
//!
//! Rendering reads case state and never mutates it; partial data is
//! permitted. Failures are surfaced to the caller as actionable errors
//! rather than swallowed.

use std::sync::Arc;

use crate::domain::case::CaseSession;
use crate::ports::{DocumentRenderer, RenderError, RenderedDocument};

/// Handler for explicit document-generation requests.
pub struct RenderDocumentHandler {
    renderer: Arc<dyn DocumentRenderer>,
}

impl RenderDocumentHandler {
    pub fn new(renderer: Arc<dyn DocumentRenderer>) -> Self {
        Self { renderer }
    }

    /// Renders the session's current known data.
    pub fn handle(
        &self,
        session: &CaseSession,
        output_name: &str,
    ) -> Result<RenderedDocument, RenderError> {
        let result = self
            .renderer
            .render(session.known_data(), session.context(), output_name);

        if let Err(err) = &result {
            tracing::error!(case = %session.id(), error = %err, "document rendering failed");
        }
        result
    }
}
