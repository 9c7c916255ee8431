//! Adapters - concrete implementations of the ports.

pub mod ai;
pub mod renderer;

pub use ai::{MockConversationExtractor, MockDocumentExtractor, OpenAiConfig, OpenAiExtractor};
pub use renderer::MarkdownFormRenderer;
