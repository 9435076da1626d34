//! Configuration for the top-level model

use holo_core::{HoloError, Result};
use serde::{Deserialize, Serialize};

/// Model configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Number of preceding tokens folded into a context vector
    pub context_window: usize,

    /// Minimum resonance with the query token for a context token to be
    /// included; `0.0` disables gating
    pub resonance_threshold: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            context_window: 4,
            resonance_threshold: 0.0,
        }
    }
}

impl ModelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the context window (at least one token)
    pub fn with_context_window(mut self, window: usize) -> Self {
        self.context_window = window.max(1);
        self
    }

    /// Set the context gate threshold
    pub fn with_resonance_threshold(mut self, threshold: f64) -> Self {
        self.resonance_threshold = threshold.clamp(-1.0, 1.0);
        self
    }

    /// Check values that bypassed the clamping setters (deserialized or
    /// restored from a snapshot)
    pub fn validate(&self) -> Result<()> {
        if self.context_window == 0 {
            return Err(HoloError::InvalidConfig(
                "context_window must be at least 1".to_string(),
            ));
        }
        if !(-1.0..=1.0).contains(&self.resonance_threshold) {
            return Err(HoloError::InvalidConfig(format!(
                "resonance_threshold {} outside [-1, 1]",
                self.resonance_threshold
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ModelConfig =
            serde_json::from_str(json).map_err(|e| HoloError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
