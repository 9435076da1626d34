//! Hardware-popcount Hamming distance and batch resonance scans
//!
//! On x86_64 the word loop is compiled with the `popcnt` feature when the CPU
//! reports it; elsewhere the portable `count_ones` loop is used.

use rayon::prelude::*;

use crate::{HyperVector, DIMENSION};

/// Hamming distance using the best available popcount
#[cfg(target_arch = "x86_64")]
pub fn hamming_distance_simd(a: &HyperVector, b: &HyperVector) -> usize {
    if is_x86_feature_detected!("popcnt") {
        // SAFETY: the CPU supports popcnt, checked above.
        unsafe { hamming_distance_popcnt(a.words(), b.words()) }
    } else {
        hamming_distance_scalar(a.words(), b.words())
    }
}

/// Fallback for non-x86_64 architectures
#[cfg(not(target_arch = "x86_64"))]
pub fn hamming_distance_simd(a: &HyperVector, b: &HyperVector) -> usize {
    hamming_distance_scalar(a.words(), b.words())
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "popcnt")]
unsafe fn hamming_distance_popcnt(a: &[u64], b: &[u64]) -> usize {
    let mut distance = 0;

    // Four words per iteration keeps independent popcounts in flight
    let chunks = a.len() / 4;
    for i in 0..chunks {
        let idx = i * 4;
        distance += (a[idx] ^ b[idx]).count_ones() as usize;
        distance += (a[idx + 1] ^ b[idx + 1]).count_ones() as usize;
        distance += (a[idx + 2] ^ b[idx + 2]).count_ones() as usize;
        distance += (a[idx + 3] ^ b[idx + 3]).count_ones() as usize;
    }

    for idx in chunks * 4..a.len() {
        distance += (a[idx] ^ b[idx]).count_ones() as usize;
    }

    distance
}

fn hamming_distance_scalar(a: &[u64], b: &[u64]) -> usize {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x ^ y).count_ones() as usize)
        .sum()
}

/// Resonance computed with the accelerated Hamming distance
pub fn resonance_simd(a: &HyperVector, b: &HyperVector) -> f64 {
    1.0 - hamming_distance_simd(a, b) as f64 / DIMENSION as f64
}

/// Resonance of `query` against each candidate, in candidate order
pub fn batch_resonances<'a, I>(query: &HyperVector, candidates: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a HyperVector>,
{
    candidates
        .into_iter()
        .map(|candidate| resonance_simd(query, candidate))
        .collect()
}

/// Parallel version of [`batch_resonances`]; output order matches input order
pub fn parallel_batch_resonances(query: &HyperVector, candidates: &[&HyperVector]) -> Vec<f64> {
    candidates
        .par_iter()
        .map(|candidate| resonance_simd(query, candidate))
        .collect()
}
