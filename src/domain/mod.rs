//! Domain layer - pure types and the field-completion engine.
//!
//! Nothing in this layer performs I/O. Extraction, rendering, and
//! configuration live behind ports and adapters.

pub mod case;
pub mod foundation;
pub mod schema;
