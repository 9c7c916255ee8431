//! Shared value objects used across the domain layer.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode};
pub use ids::CaseId;
pub use timestamp::Timestamp;
