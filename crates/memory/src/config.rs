//! Configuration for the gated and multi-scale memories

use serde::{Deserialize, Serialize};

/// Entropy gate thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    /// At or above this resonance the incoming value is already known
    pub redundant_high: f64,

    /// At or below this resonance the update is treated as noise and rejected
    pub noisy_low: f64,

    /// At or above this resonance (and below `redundant_high`) the update is boosted
    pub boost_threshold: f64,

    /// Lower trace density bound. Accepted and reported, never enforced.
    pub min_density: f64,

    /// Upper trace density bound. Accepted and reported, never enforced.
    pub max_density: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            redundant_high: 0.92,
            noisy_low: 0.52,
            boost_threshold: 0.80,
            min_density: 0.0,
            max_density: 1.0,
        }
    }
}

impl GateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the redundancy threshold
    pub fn with_redundant_high(mut self, threshold: f64) -> Self {
        self.redundant_high = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the noise threshold
    pub fn with_noisy_low(mut self, threshold: f64) -> Self {
        self.noisy_low = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the boost threshold
    pub fn with_boost_threshold(mut self, threshold: f64) -> Self {
        self.boost_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the (inert) density bounds
    pub fn with_density_bounds(mut self, min: f64, max: f64) -> Self {
        self.min_density = min.clamp(0.0, 1.0);
        self.max_density = max.clamp(self.min_density, 1.0);
        self
    }
}

/// Multi-scale memory configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MultiScaleConfig {
    /// Route n-gram writes through the entropy gate
    ///
    /// Off by default: with the gate on, a store's first fact makes later
    /// unrelated facts look like noise, and they are rejected.
    pub gate_writes: bool,

    /// Gate thresholds used when `gate_writes` is on
    pub gate: GateConfig,
}

impl MultiScaleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable gated writes
    pub fn with_gate_writes(mut self, enabled: bool) -> Self {
        self.gate_writes = enabled;
        self
    }

    /// Set gate thresholds
    pub fn with_gate(mut self, gate: GateConfig) -> Self {
        self.gate = gate;
        self
    }
}
