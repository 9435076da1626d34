//! Core type definitions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token returned by lookups and predictions that have nothing to offer
/// (empty context, empty store, or best match below the acceptance threshold).
pub const UNKNOWN_TOKEN: &str = "<unknown>";

/// Identifier for a model instance (UUIDv7 for time ordering)
///
/// Models are created per session; the id only labels snapshots and log
/// lines and never influences predictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelId(pub Uuid);

impl ModelId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ModelId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
