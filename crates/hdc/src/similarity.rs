//! Similarity metrics and ranked lookups over hypervectors

use crate::HyperVector;

/// Resonance between two hypervectors: `1 - hamming / D`
pub fn resonance(a: &HyperVector, b: &HyperVector) -> f64 {
    a.resonance(b)
}

/// Hamming distance (number of differing bits)
pub fn hamming_distance(a: &HyperVector, b: &HyperVector) -> usize {
    a.hamming_distance(b)
}

/// Index and score of the highest score, keeping the first-seen maximum
///
/// Uses a strict `>` comparison, so among equal scores the lowest index wins.
pub fn first_best(scores: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((idx, score)),
        }
    }
    best
}
