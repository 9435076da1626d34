//! Cleanup memory: decode noisy hypervectors back to tokens
//!
//! Prototypes live in a `BTreeMap`, so every scan visits tokens in
//! lexicographic order and ties between equally resonant prototypes are
//! always won by the lexicographically smallest token.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BinaryHeap};

use holo_core::UNKNOWN_TOKEN;
use holo_hdc::{HyperVector, WeightedBundler};

/// Prototype table mapping tokens to canonical hypervectors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupMemory {
    prototypes: BTreeMap<String, HyperVector>,
}

impl CleanupMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the prototype for `token`, returning the old one
    pub fn insert(&mut self, token: impl Into<String>, vector: HyperVector) -> Option<HyperVector> {
        self.prototypes.insert(token.into(), vector)
    }

    pub fn get(&self, token: &str) -> Option<&HyperVector> {
        self.prototypes.get(token)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.prototypes.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    /// Prototypes in lexicographic token order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HyperVector)> {
        self.prototypes.iter().map(|(token, v)| (token.as_str(), v))
    }

    /// Most resonant prototype, with its resonance
    pub fn best_match(&self, target: &HyperVector) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for (token, prototype) in self.iter() {
            let r = target.resonance(prototype);
            match best {
                Some((_, best_r)) if r <= best_r => {}
                _ => best = Some((token, r)),
            }
        }
        best
    }

    /// Token of the best match, or [`UNKNOWN_TOKEN`] below `min_resonance`
    pub fn decode(&self, target: &HyperVector, min_resonance: f64) -> &str {
        match self.best_match(target) {
            Some((token, r)) if r >= min_resonance => token,
            _ => UNKNOWN_TOKEN,
        }
    }

    /// The `k` most resonant prototypes, best first
    pub fn top_k(&self, target: &HyperVector, k: usize) -> Vec<(&str, f64)> {
        if k == 0 {
            return Vec::new();
        }

        // Min-heap of the best k seen so far; the root is the weakest
        let mut heap = BinaryHeap::with_capacity(k.min(self.len()) + 1);
        for (token, prototype) in self.iter() {
            heap.push(Reverse(Ranked {
                token,
                resonance: target.resonance(prototype),
            }));
            if heap.len() > k {
                heap.pop();
            }
        }

        heap.into_sorted_vec()
            .into_iter()
            .map(|Reverse(ranked)| (ranked.token, ranked.resonance))
            .collect()
    }

    /// Decode with a soft-voting fallback
    ///
    /// When the best prototype already reaches `accept_if_above` it is
    /// returned directly. Otherwise the top `k` prototypes are bundled with
    /// weights `k, k-1, ..., 1` (best first) and the bundle is decoded
    /// against the table with `min_resonance`.
    pub fn decode_clustered(
        &self,
        target: &HyperVector,
        k: usize,
        min_resonance: f64,
        accept_if_above: f64,
    ) -> &str {
        match self.best_match(target) {
            None => return UNKNOWN_TOKEN,
            Some((token, r)) if r >= accept_if_above => return token,
            Some(_) => {}
        }

        let candidates = self.top_k(target, k);
        let mut bundler = WeightedBundler::new();
        let n = candidates.len();
        for (rank, (token, _)) in candidates.iter().enumerate() {
            if let Some(prototype) = self.prototypes.get(*token) {
                bundler.add(prototype, (n - rank) as u32);
            }
        }

        if bundler.is_empty() {
            return UNKNOWN_TOKEN;
        }

        self.decode(&bundler.build(), min_resonance)
    }
}

/// Candidate ordered by resonance, then by reverse token so the
/// lexicographically smaller token ranks higher on ties
#[derive(Debug)]
struct Ranked<'a> {
    token: &'a str,
    resonance: f64,
}

impl Ord for Ranked<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.resonance
            .total_cmp(&other.resonance)
            .then_with(|| other.token.cmp(self.token))
    }
}

impl PartialOrd for Ranked<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ranked<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked<'_> {}
