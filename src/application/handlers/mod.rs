//! Per-event handlers running the fixed extraction pipeline.

mod render_document;
mod send_message;
mod submit_document;

pub use render_document::RenderDocumentHandler;
pub use send_message::{MessageOutcome, SendMessageHandler};
pub use submit_document::{DocumentOutcome, SubmitDocumentHandler};
