//! Application layer - event dispatch over the completion engine.

mod dispatch;
pub mod handlers;

pub use dispatch::{CaseEvent, DispatchError, Dispatcher, EventOutcome};
