//! Multi-order n-gram memory with blended backoff
//!
//! Six transition stores: forward and backward, each at order 1, 2 and 3.
//! Longer contexts are more specific, so they are written with more weight
//! (1, 2, 4) and dominate the prediction blend (1, 3, 6). The blend is a
//! superposition-space analogue of backoff smoothing in n-gram language
//! models: when a trigram store has seen the context its vote outweighs the
//! lower orders combined, otherwise the bigram and unigram stores decide.

use holo_hdc::encoder::{backward_key, context_key, following_key, forward_key, MAX_ORDER};
use holo_hdc::{HyperVector, WeightedBundler};
use tracing::debug;

use crate::config::MultiScaleConfig;
use crate::gate::EntropyGate;
use crate::transition::TransitionMemory;

/// Write weight per order (index 0 = unigram)
pub const WRITE_WEIGHTS: [u32; MAX_ORDER] = [1, 2, 4];

/// Blend weight per order (index 0 = unigram)
pub const BLEND_WEIGHTS: [u32; MAX_ORDER] = [1, 3, 6];

/// Direction of a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone)]
pub struct MultiScaleMemory {
    forward: [TransitionMemory; MAX_ORDER],
    backward: [TransitionMemory; MAX_ORDER],
    gate: EntropyGate,
    config: MultiScaleConfig,
}

impl MultiScaleMemory {
    pub fn new(config: MultiScaleConfig) -> Self {
        Self {
            forward: std::array::from_fn(|_| TransitionMemory::new()),
            backward: std::array::from_fn(|_| TransitionMemory::new()),
            gate: EntropyGate::new(config.gate),
            config,
        }
    }

    pub fn config(&self) -> &MultiScaleConfig {
        &self.config
    }

    /// Learn every transition of a sequence, in both directions
    pub fn learn(&mut self, seq: &[HyperVector]) {
        for t in 0..seq.len() {
            self.learn_at(seq, t);
        }
    }

    /// Learn the transitions around position `t`
    ///
    /// Forward stores learn `seq[t+1]` from the n-grams ending at `t`;
    /// backward stores learn `seq[t-1]` from the n-grams starting at `t`.
    /// Orders without enough surrounding context are skipped.
    pub fn learn_at(&mut self, seq: &[HyperVector], t: usize) {
        let gate = self.config.gate_writes.then_some(&self.gate);

        if let Some(next) = seq.get(t + 1) {
            for (idx, store) in self.forward.iter_mut().enumerate() {
                if let Some(key) = forward_key(seq, t, idx + 1) {
                    store.put(&key, next, WRITE_WEIGHTS[idx], gate);
                }
            }
        }

        if let Some(prev) = t.checked_sub(1).and_then(|p| seq.get(p)) {
            for (idx, store) in self.backward.iter_mut().enumerate() {
                if let Some(key) = backward_key(seq, t, idx + 1) {
                    store.put(&key, prev, WRITE_WEIGHTS[idx], gate);
                }
            }
        }
    }

    /// Blend of the forward predictions for the token after `context`
    ///
    /// `None` when the context is empty or no usable store has data.
    pub fn predict_next(&mut self, context: &[HyperVector]) -> Option<HyperVector> {
        let keys = std::array::from_fn(|idx| context_key(context, idx + 1));
        blend(&mut self.forward, keys)
    }

    /// Blend of the backward predictions for the token before `following`
    pub fn predict_previous(&mut self, following: &[HyperVector]) -> Option<HyperVector> {
        let keys = std::array::from_fn(|idx| following_key(following, idx + 1));
        blend(&mut self.backward, keys)
    }

    /// Age all six stores by `2^k` (idle consolidation)
    pub fn age_shift_all(&mut self, k: u32) {
        for store in self.forward.iter_mut().chain(self.backward.iter_mut()) {
            store.age_shift(k);
        }
        debug!(k, "aged multi-scale stores");
    }

    /// The store for a direction and order (1..=3)
    pub fn store(&self, direction: Direction, order: usize) -> Option<&TransitionMemory> {
        let stores = match direction {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
        };
        order.checked_sub(1).and_then(|idx| stores.get(idx))
    }
}

impl Default for MultiScaleMemory {
    fn default() -> Self {
        Self::new(MultiScaleConfig::default())
    }
}

fn blend(
    stores: &mut [TransitionMemory; MAX_ORDER],
    keys: [Option<HyperVector>; MAX_ORDER],
) -> Option<HyperVector> {
    let mut bundler = WeightedBundler::new();

    for ((store, key), weight) in stores.iter_mut().zip(keys.iter()).zip(BLEND_WEIGHTS) {
        if let Some(key) = key {
            if store.has_data() {
                bundler.add(&store.get(key), weight);
            }
        }
    }

    if bundler.is_empty() {
        None
    } else {
        Some(bundler.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(names: &[&str]) -> Vec<HyperVector> {
        names.iter().map(|n| HyperVector::from_seed(n)).collect()
    }

    /// `A B A B ... A` with `pairs` AB pairs and a trailing A
    fn alternating(a: &HyperVector, b: &HyperVector, pairs: usize) -> Vec<HyperVector> {
        let mut seq = Vec::with_capacity(pairs * 2 + 1);
        for _ in 0..pairs {
            seq.push(a.clone());
            seq.push(b.clone());
        }
        seq.push(a.clone());
        seq
    }

    #[test]
    fn test_empty_memory_predicts_nothing() {
        let mut memory = MultiScaleMemory::default();
        let ctx = tokens(&["a"]);
        assert!(memory.predict_next(&ctx).is_none());
        assert!(memory.predict_next(&[]).is_none());
        assert!(memory.predict_previous(&ctx).is_none());
    }

    #[test]
    fn test_write_orders_by_position() {
        let mut memory = MultiScaleMemory::default();
        let seq = tokens(&["a", "b", "c"]);
        memory.learn(&seq);

        // Forward: unigrams at t=0,1; bigram at t=1; no trigram
        let weight = |d, o| memory.store(d, o).map(|s| s.total_weight());
        assert_eq!(weight(Direction::Forward, 1), Some(2));
        assert_eq!(weight(Direction::Forward, 2), Some(2));
        assert_eq!(weight(Direction::Forward, 3), Some(0));

        // Backward mirrors forward
        assert_eq!(weight(Direction::Backward, 1), Some(2));
        assert_eq!(weight(Direction::Backward, 2), Some(2));
        assert_eq!(weight(Direction::Backward, 3), Some(0));

        assert!(memory.store(Direction::Forward, 0).is_none());
        assert!(memory.store(Direction::Forward, 4).is_none());
    }

    #[test]
    fn test_single_sequence_recall() {
        let mut memory = MultiScaleMemory::default();
        let seq = tokens(&["the", "cat", "sat", "on", "mat"]);
        memory.learn(&seq);

        // The trigram vote outweighs bigram and unigram combined
        let predicted = memory.predict_next(&seq[..3]).unwrap();
        assert!(predicted.resonance(&seq[3]) > 0.6);
        assert!(predicted.resonance(&seq[4]) < 0.6);

        let previous = memory.predict_previous(&seq[2..]).unwrap();
        assert!(previous.resonance(&seq[1]) > 0.6);
    }

    #[test]
    fn test_alternating_sequence() {
        let a = HyperVector::from_seed("A");
        let b = HyperVector::from_seed("B");
        let seq = alternating(&a, &b, 10);

        let mut memory = MultiScaleMemory::default();
        memory.learn(&seq);

        // Trailing A -> B
        let after_a = memory.predict_next(&[b.clone(), a.clone(), b.clone(), a.clone()]).unwrap();
        assert!(after_a.resonance(&b) > 0.6, "resonance {}", after_a.resonance(&b));
        assert!(after_a.resonance(&b) > after_a.resonance(&a));

        // Trailing B -> A
        let after_b = memory.predict_next(&[a.clone(), b.clone(), a.clone(), b.clone()]).unwrap();
        assert!(after_b.resonance(&a) > 0.6, "resonance {}", after_b.resonance(&a));
        assert!(after_b.resonance(&a) > after_b.resonance(&b));
    }

    #[test]
    fn test_backoff_to_lower_orders() {
        let mut memory = MultiScaleMemory::default();
        let seq = tokens(&["x", "y"]);
        memory.learn(&seq);

        // Only the unigram store has data; the unseen bigram [z x] backs off to it
        let predicted = memory.predict_next(&tokens(&["z", "x"])).unwrap();
        assert_eq!(predicted, seq[1]);
    }

    #[test]
    fn test_age_shift_all() {
        let mut memory = MultiScaleMemory::default();
        memory.learn(&tokens(&["a", "b", "c", "d"]));
        memory.age_shift_all(16);

        for order in 1..=3 {
            assert!(!memory.store(Direction::Forward, order).unwrap().has_data());
            assert!(!memory.store(Direction::Backward, order).unwrap().has_data());
        }
        assert!(memory.predict_next(&tokens(&["a"])).is_none());
    }

    #[test]
    fn test_gated_writes_reject_conflicts() {
        let config = MultiScaleConfig::new().with_gate_writes(true);
        let mut memory = MultiScaleMemory::new(config);
        memory.learn(&tokens(&["p", "q"]));
        memory.learn(&tokens(&["r", "s"]));

        // Second unrelated unigram fact looks like noise to the gate
        let unigram = memory.store(Direction::Forward, 1).unwrap();
        assert_eq!(unigram.total_weight(), 1);
    }
}
