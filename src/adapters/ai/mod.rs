//! Extraction adapters backed by language-model APIs, plus test mocks.

mod mock;
mod openai;

pub use mock::{MockConversationExtractor, MockDocumentExtractor, RecordedConversationCall};
pub use openai::{OpenAiConfig, OpenAiExtractor};
