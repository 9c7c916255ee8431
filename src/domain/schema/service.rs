//! Service contexts and the service registry.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::field::FieldSchema;

/// Stable identifier for a service definition (e.g. `identity_card`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    /// Creates a service identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ServiceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// The active service definition: schema plus service metadata.
///
/// Contexts are read-only from the engine's perspective; selecting a
/// different context resets the case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceContext {
    /// Stable registry key.
    pub id: ServiceId,
    /// Display name shown in greetings and document headers.
    pub name: String,
    /// Short description of the procedure.
    pub description: String,
    /// Output document identifier passed to the renderer.
    pub template_file: String,
    /// Required fields for this service.
    pub schema: FieldSchema,
}

/// Enumerable, read-only collection of service contexts.
///
/// Services are a fixed set defined at build time, not user-created.
#[derive(Debug, Clone)]
pub struct ServiceRegistry {
    services: Vec<ServiceContext>,
}

impl ServiceRegistry {
    /// Creates a registry from a fixed list of contexts.
    pub fn new(services: Vec<ServiceContext>) -> Self {
        Self { services }
    }

    /// Looks up a service by id.
    pub fn get(&self, id: &ServiceId) -> Option<&ServiceContext> {
        self.services.iter().find(|svc| &svc.id == id)
    }

    /// Returns the default service (the first registered one).
    pub fn default_service(&self) -> Option<&ServiceContext> {
        self.services.first()
    }

    /// Iterates all registered services.
    pub fn iter(&self) -> impl Iterator<Item = &ServiceContext> {
        self.services.iter()
    }

    /// Returns the number of registered services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns true if no services are registered.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
