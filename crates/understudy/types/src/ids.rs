use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Identity of a single stand-in instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub uuid::Uuid);

impl InstanceId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "inst:{}", self.0)
    }
}

/// The object an invocation was made on.
///
/// Carries identity only. The pipeline never owns or dereferences the
/// stand-in itself, so a target can be freely cloned into recorded calls.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Target {
    id: InstanceId,
    type_name: Arc<str>,
}

impl Target {
    /// Allocate a fresh identity for an instance of `type_name`.
    pub fn new(type_name: impl Into<Arc<str>>) -> Self {
        Self::with_id(InstanceId::new(), type_name)
    }

    pub fn with_id(id: InstanceId, type_name: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            type_name: type_name.into(),
        }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.type_name, self.id)
    }
}
