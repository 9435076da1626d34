//! Superposition capacity instrumentation
//!
//! Measures how recall quality degrades as more associations share one
//! hologram. For `n` random `key -> value` pairs bundled into a single
//! [`TransitionMemory`], the recall margin is the mean of
//! `resonance(get(key), value) - resonance(get(key), decoy)` over all pairs.
//! It starts at 0.5 for a single pair and shrinks roughly like `1/sqrt(n)`.

use holo_hdc::HyperVector;

use crate::transition::TransitionMemory;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityReport {
    /// Number of associations bundled into the hologram
    pub associations: usize,
    /// Mean resonance between recalled and stored value
    pub value_resonance: f64,
    /// Mean resonance between recalled value and an unrelated decoy
    pub decoy_resonance: f64,
}

impl CapacityReport {
    pub fn margin(&self) -> f64 {
        self.value_resonance - self.decoy_resonance
    }
}

/// Bundle `associations` seeded random pairs into one store and measure recall
pub fn recall_margin(associations: usize, seed: u64) -> CapacityReport {
    let base = seed.wrapping_mul(1_000_003);
    let vector = |i: usize, role: u64| {
        HyperVector::random_seeded(base.wrapping_add(i as u64 * 3 + role))
    };

    let pairs: Vec<(HyperVector, HyperVector)> = (0..associations)
        .map(|i| (vector(i, 0), vector(i, 1)))
        .collect();

    let mut memory = TransitionMemory::new();
    for (key, value) in &pairs {
        memory.put(key, value, 1, None);
    }

    let mut value_total = 0.0;
    let mut decoy_total = 0.0;
    for (i, (key, value)) in pairs.iter().enumerate() {
        let recalled = memory.get(key);
        value_total += recalled.resonance(value);
        decoy_total += recalled.resonance(&vector(i, 2));
    }

    let n = associations.max(1) as f64;
    CapacityReport {
        associations,
        value_resonance: value_total / n,
        decoy_resonance: decoy_total / n,
    }
}
