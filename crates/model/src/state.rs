//! Plain exportable model state

use std::collections::BTreeMap;

use holo_hdc::HyperVector;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;

/// One learned transition: the context hologram and the token that followed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    pub context: HyperVector,
    pub next_token: String,
    pub next_vector: HyperVector,
}

/// Everything needed to rebuild a model
///
/// Exactly the embeddings table, the full association list in learning
/// order, and the two context parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelState {
    pub embeddings: BTreeMap<String, HyperVector>,
    pub associations: Vec<Association>,
    pub context_window: usize,
    pub resonance_threshold: f64,
}

impl ModelState {
    pub fn config(&self) -> ModelConfig {
        ModelConfig {
            context_window: self.context_window,
            resonance_threshold: self.resonance_threshold,
        }
    }
}
