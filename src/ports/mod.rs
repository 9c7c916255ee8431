//! Ports - trait boundaries consumed or produced by the engine.

mod extractor;
mod renderer;

pub use extractor::{
    ContinuationSignal, ConversationExtraction, ConversationExtractor, DocumentExtractor,
    ExtractorError, ImageEvidence,
};
pub use renderer::{DocumentRenderer, RenderError, RenderedDocument};
