//! Key→value store holding all associations in one hologram
//!
//! `put` bundles the trace `key ⊕ value` into a weighted accumulator; `get`
//! XORs the built hologram with a query key, which recovers an approximation
//! of the stored value. The hologram is rebuilt lazily and cached until the
//! next write.

use holo_hdc::{HyperVector, WeightedBundler};
use tracing::{debug, trace};

use crate::gate::{EntropyGate, GateDecision};

/// Total weight above which the accumulator is halved before the next write
pub const AGING_THRESHOLD: i64 = 1 << 20;

#[derive(Debug, Clone, Default)]
pub struct TransitionMemory {
    bundler: WeightedBundler,
    hologram: Option<HyperVector>,
}

impl TransitionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `key -> value` with `weight`, optionally filtered by `gate`
    ///
    /// Returns the gate decision; without a gate the write is always `Normal`.
    /// A rejected write leaves the store untouched.
    pub fn put(
        &mut self,
        key: &HyperVector,
        value: &HyperVector,
        weight: u32,
        gate: Option<&EntropyGate>,
    ) -> GateDecision {
        let trace = key.bind(value);

        let decision = match gate {
            Some(gate) => {
                let existing = if self.has_data() { Some(self.get(key)) } else { None };
                gate.decide(key, value, &trace, existing.as_ref())
            }
            None => GateDecision::Normal,
        };

        let weight = weight.saturating_mul(decision.multiplier());
        if weight == 0 {
            trace!(?decision, "write skipped");
            return decision;
        }

        if self.bundler.total_weight() > AGING_THRESHOLD {
            debug!(total_weight = self.bundler.total_weight(), "aging saturated hologram");
            self.bundler.age_shift(1);
        }

        self.bundler.add(&trace, weight);
        self.hologram = None;
        decision
    }

    /// Approximate value stored under `key`
    pub fn get(&mut self, key: &HyperVector) -> HyperVector {
        self.hologram().bind(key)
    }

    /// The bundled hologram, rebuilt if a write happened since the last read
    pub fn hologram(&mut self) -> &HyperVector {
        self.hologram.get_or_insert_with(|| self.bundler.build())
    }

    pub fn has_data(&self) -> bool {
        self.total_weight() > 0
    }

    pub fn total_weight(&self) -> i64 {
        self.bundler.total_weight()
    }

    /// Age the accumulator by `2^k`
    pub fn age_shift(&mut self, k: u32) {
        self.bundler.age_shift(k);
        self.hologram = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GateConfig;

    #[test]
    fn test_single_pair_recall() {
        for i in 0..20u64 {
            let key = HyperVector::random_seeded(i * 3);
            let value = HyperVector::random_seeded(i * 3 + 1);
            let decoy = HyperVector::random_seeded(i * 3 + 2);

            let mut memory = TransitionMemory::new();
            memory.put(&key, &value, 1, None);

            let recalled = memory.get(&key);
            assert!(recalled.resonance(&value) > recalled.resonance(&decoy) + 0.3);
        }
    }

    #[test]
    fn test_empty_store() {
        let memory = TransitionMemory::new();
        assert!(!memory.has_data());
        assert_eq!(memory.total_weight(), 0);
    }

    #[test]
    fn test_majority_association_wins() {
        let mut memory = TransitionMemory::new();
        let key = HyperVector::from_seed("key");
        let a = HyperVector::from_seed("a");
        let b = HyperVector::from_seed("b");

        memory.put(&key, &a, 3, None);
        memory.put(&key, &b, 1, None);
        assert_eq!(memory.get(&key), a);
    }

    #[test]
    fn test_cache_invalidated_on_write() {
        let mut memory = TransitionMemory::new();
        let key = HyperVector::from_seed("key");
        let a = HyperVector::from_seed("a");
        let b = HyperVector::from_seed("b");

        memory.put(&key, &a, 1, None);
        assert_eq!(memory.get(&key), a);

        memory.put(&key, &b, 5, None);
        assert_eq!(memory.get(&key), b);
    }

    #[test]
    fn test_gate_rejects_unrelated_value() {
        let gate = EntropyGate::new(GateConfig::default());
        let mut memory = TransitionMemory::new();
        let key = HyperVector::from_seed("key");
        let value = HyperVector::from_seed("value");
        let other = HyperVector::from_seed("other");

        assert_eq!(memory.put(&key, &value, 1, Some(&gate)), GateDecision::Normal);
        assert_eq!(memory.put(&key, &other, 1, Some(&gate)), GateDecision::Reject);
        assert_eq!(memory.total_weight(), 1);
        assert_eq!(memory.get(&key), value);
    }

    #[test]
    fn test_gate_boost_doubles_weight() {
        let gate = EntropyGate::default();
        let mut memory = TransitionMemory::new();
        let key = HyperVector::from_seed("key");
        let value = HyperVector::from_seed("value");

        let mut variant = value.clone();
        for i in 0..1_500 {
            variant.flip(i);
        }

        memory.put(&key, &variant, 1, Some(&gate));
        assert_eq!(memory.put(&key, &value, 1, Some(&gate)), GateDecision::Boost);
        assert_eq!(memory.total_weight(), 3);
        assert_eq!(memory.get(&key), value);
    }

    #[test]
    fn test_safety_valve_ages_before_write() {
        let mut memory = TransitionMemory::new();
        let key = HyperVector::from_seed("key");
        let value = HyperVector::from_seed("value");

        memory.put(&key, &value, (AGING_THRESHOLD + 1) as u32, None);
        assert_eq!(memory.total_weight(), AGING_THRESHOLD + 1);

        memory.put(&key, &value, 1, None);
        assert_eq!(memory.total_weight(), (AGING_THRESHOLD + 1) / 2 + 1);
        assert_eq!(memory.get(&key), value);
    }

    #[test]
    fn test_age_shift() {
        let mut memory = TransitionMemory::new();
        let key = HyperVector::from_seed("key");
        let value = HyperVector::from_seed("value");

        memory.put(&key, &value, 4, None);
        memory.age_shift(1);
        assert_eq!(memory.total_weight(), 2);
        assert_eq!(memory.get(&key), value);

        memory.age_shift(8);
        assert!(!memory.has_data());
    }
}
