//! Document rendering adapters.

mod markdown;

pub use markdown::MarkdownFormRenderer;
