//! Weighted superposition of hypervectors
//!
//! Each dimension keeps a signed vote: `+w` when a vector with that bit set is
//! added with weight `w`, `-w` when the bit is unset. Instead of touching all
//! `D` counters for the unset bits, the accumulator stores a shared `bias`
//! (decremented by `w` on every add) plus a per-dimension `delta` that only
//! grows by `2w` for set bits. The vote for dimension `i` is `bias + delta[i]`.
//!
//! Capacity is bounded: as more unrelated vectors are superposed the built
//! vector drifts toward noise, and beyond roughly `sqrt(D)` independent
//! members individual members stop being recoverable. The
//! `recall_margin` instrumentation in `holo-memory` measures this.

use crate::hypervector::WORDS;
use crate::{HyperVector, DIMENSION};

/// Per-dimension signed vote accumulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedBundler {
    bias: i64,
    delta: Vec<i64>,
    total_weight: i64,
}

impl WeightedBundler {
    pub fn new() -> Self {
        Self {
            bias: 0,
            delta: vec![0; DIMENSION],
            total_weight: 0,
        }
    }

    /// Add a vote of `weight` for every bit of `v`
    pub fn add(&mut self, v: &HyperVector, weight: u32) {
        if weight == 0 {
            return;
        }

        let w = weight as i64;
        self.bias -= w;
        for i in v.as_bitvec().iter_ones() {
            self.delta[i] += 2 * w;
        }
        self.total_weight += w;
    }

    /// Threshold every dimension: a vote `>= 0` sets the bit
    ///
    /// Exact ties therefore resolve to 1. An empty bundler has every vote at
    /// zero and builds the all-ones vector.
    pub fn build(&self) -> HyperVector {
        let mut words = vec![0u64; WORDS];
        for (word, chunk) in words.iter_mut().zip(self.delta.chunks(64)) {
            for (bit, delta) in chunk.iter().enumerate() {
                if self.bias + delta >= 0 {
                    *word |= 1u64 << bit;
                }
            }
        }
        HyperVector::from_words(words)
    }

    /// Arithmetic right shift (floor division by `2^k`) of every counter
    ///
    /// Approximates exponential forgetting; total weight is clamped at zero.
    pub fn age_shift(&mut self, k: u32) {
        if k == 0 {
            return;
        }

        let k = k.min(63);
        self.bias >>= k;
        for d in self.delta.iter_mut() {
            *d >>= k;
        }
        self.total_weight = (self.total_weight >> k).max(0);
    }

    /// Sum of the weights added so far, after aging
    pub fn total_weight(&self) -> i64 {
        self.total_weight
    }

    pub fn is_empty(&self) -> bool {
        self.total_weight == 0
    }

    /// Current vote for one dimension
    pub fn vote(&self, index: usize) -> Option<i64> {
        self.delta.get(index).map(|d| self.bias + d)
    }
}

impl Default for WeightedBundler {
    fn default() -> Self {
        Self::new()
    }
}
