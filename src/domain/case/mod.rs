//! The field-completion engine.
//!
//! A case is one user's in-progress attempt to complete one service's form,
//! bounded by reset and service-switch events. The [`CaseSession`] owns the
//! validated field values ([`KnownData`]) and the dialogue [`Transcript`];
//! untrusted extractor output ([`ExtractionCandidate`]) must pass through
//! [`normalize`] before it can reach case state.

mod candidate;
mod known_data;
mod normalizer;
mod session;
mod status;
mod transcript;
mod value;

pub use candidate::{ExtractionCandidate, NormalizedDelta};
pub use known_data::KnownData;
pub use normalizer::normalize;
pub use session::CaseSession;
pub use status::CompletionStatus;
pub use transcript::{Transcript, Turn, TurnRole, CONTEXT_WINDOW_TURNS};
pub use value::FieldValue;
