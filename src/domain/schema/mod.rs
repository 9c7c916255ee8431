//! Form schemas and service definitions.
//!
//! A [`FieldSchema`] is the ordered set of fields one service requires.
//! A [`ServiceContext`] pairs a schema with service metadata, and the
//! [`ServiceRegistry`] holds the fixed set of supported services.

mod field;
mod registry;
mod service;

pub use field::{FieldFormat, FieldId, FieldSchema, FieldSpec};
pub use registry::registry;
pub use service::{ServiceContext, ServiceId, ServiceRegistry};
