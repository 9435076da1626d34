//! Novelty gate controlling how strongly an update is written
//!
//! The gate compares the incoming value with what the store already
//! predicts for the key. Values the store already reproduces are written at
//! normal weight, plausible refinements are boosted, and values that look
//! like chance (no relation to the current prediction) are rejected.
//!
//! Rejecting near-chance updates treats a genuinely new, unrelated fact the
//! same way as noise. That is a deliberate policy with a real cost: a store
//! holding one fact will reject most unrelated facts written later.

use holo_hdc::HyperVector;
use tracing::trace;

use crate::config::GateConfig;

/// Outcome of a gate decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Discard the update
    Reject,
    /// Write at the requested weight
    Normal,
    /// Write at double the requested weight
    Boost,
}

impl GateDecision {
    /// Factor applied to the requested write weight
    pub fn multiplier(self) -> u32 {
        match self {
            GateDecision::Reject => 0,
            GateDecision::Normal => 1,
            GateDecision::Boost => 2,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntropyGate {
    config: GateConfig,
}

impl EntropyGate {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Classify an update of `key -> incoming` whose trace is `trace`
    ///
    /// `existing` is the store's current prediction for `key`, or `None`
    /// when the store is empty.
    pub fn decide(
        &self,
        _key: &HyperVector,
        incoming: &HyperVector,
        trace: &HyperVector,
        existing: Option<&HyperVector>,
    ) -> GateDecision {
        let density = trace.density();
        let within_bounds =
            density >= self.config.min_density && density <= self.config.max_density;
        trace!(density, within_bounds, "trace density (bounds not enforced)");

        let Some(existing) = existing else {
            return GateDecision::Normal;
        };

        let r = existing.resonance(incoming);
        let decision = if r >= self.config.redundant_high {
            GateDecision::Normal
        } else if r <= self.config.noisy_low {
            GateDecision::Reject
        } else if r >= self.config.boost_threshold {
            GateDecision::Boost
        } else {
            GateDecision::Normal
        };

        trace!(resonance = r, ?decision, "gate decision");
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Copy of `v` with the first `n` bits flipped
    fn flipped(v: &HyperVector, n: usize) -> HyperVector {
        let mut out = v.clone();
        for i in 0..n {
            out.flip(i);
        }
        out
    }

    fn decide(existing: Option<&HyperVector>, incoming: &HyperVector) -> GateDecision {
        let key = HyperVector::from_seed("key");
        let trace = key.bind(incoming);
        EntropyGate::default().decide(&key, incoming, &trace, existing)
    }

    #[test]
    fn test_empty_store_is_normal() {
        let value = HyperVector::from_seed("value");
        assert_eq!(decide(None, &value), GateDecision::Normal);
    }

    #[test]
    fn test_redundant_is_normal() {
        let value = HyperVector::from_seed("value");
        assert_eq!(decide(Some(&value), &value), GateDecision::Normal);

        // 5% of bits differ: resonance 0.95
        let close = flipped(&value, 500);
        assert_eq!(decide(Some(&close), &value), GateDecision::Normal);
    }

    #[test]
    fn test_noise_is_rejected() {
        let existing = HyperVector::from_seed("existing");
        let unrelated = HyperVector::from_seed("unrelated");
        assert_eq!(decide(Some(&existing), &unrelated), GateDecision::Reject);
    }

    #[test]
    fn test_plausible_novelty_is_boosted() {
        let value = HyperVector::from_seed("value");
        // 15% of bits differ: resonance 0.85
        let existing = flipped(&value, 1_500);
        assert_eq!(decide(Some(&existing), &value), GateDecision::Boost);
    }

    #[test]
    fn test_middle_band_is_normal() {
        let value = HyperVector::from_seed("value");
        // 30% of bits differ: resonance 0.70
        let existing = flipped(&value, 3_000);
        assert_eq!(decide(Some(&existing), &value), GateDecision::Normal);
    }

    #[test]
    fn test_density_bounds_are_inert() {
        let gate = EntropyGate::new(GateConfig::new().with_density_bounds(0.9, 1.0));
        let key = HyperVector::from_seed("key");
        let value = HyperVector::from_seed("value");
        let trace = key.bind(&value);

        // Trace density ~0.5 lies outside the bounds, decision is unchanged
        assert_eq!(gate.decide(&key, &value, &trace, None), GateDecision::Normal);
        assert_eq!(gate.decide(&key, &value, &trace, Some(&value)), GateDecision::Normal);
    }

    #[test]
    fn test_multipliers() {
        assert_eq!(GateDecision::Reject.multiplier(), 0);
        assert_eq!(GateDecision::Normal.multiplier(), 1);
        assert_eq!(GateDecision::Boost.multiplier(), 2);
    }
}
