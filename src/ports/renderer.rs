//! Document renderer port - produces a filled document from case data.
//!
//! The engine only decides *when* to render (on explicit user request,
//! never automatically) and *what* data to pass (the full current known
//! data, partial or complete). Template layout, file formats, and I/O
//! lifecycle belong to implementations.

use std::path::PathBuf;

use crate::domain::case::KnownData;
use crate::domain::schema::ServiceContext;

/// Port for producing a filled document.
///
/// Rendering never mutates case state, and re-rendering with the same data
/// is expected to produce an equivalent document.
pub trait DocumentRenderer: Send + Sync {
    /// Renders the current known data into the service's document.
    ///
    /// Partial data is permitted; unfilled fields render as blanks.
    fn render(
        &self,
        data: &KnownData,
        context: &ServiceContext,
        output_name: &str,
    ) -> Result<RenderedDocument, RenderError>;
}

/// A successfully produced document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Where the document was written.
    pub path: PathBuf,
}

/// Renderer errors, surfaced to the user as actionable failures.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Output name is empty or escapes the output directory.
    #[error("invalid output name: {0}")]
    InvalidOutputName(String),

    /// Filesystem failure while writing the document.
    #[error("failed to write document: {0}")]
    Io(#[from] std::io::Error),
}
