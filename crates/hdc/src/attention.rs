//! Holographic context encoding
//!
//! Compresses a token sequence into one fixed-size context hologram. Each
//! token is rotated by its distance from the end of the sequence, tokens that
//! do not resonate with the query are dropped (a binary stand-in for attention
//! weights), the survivors are bundled and the bundle is smoothed by the
//! cellular-automaton denoiser.

use serde::{Deserialize, Serialize};

use crate::denoiser::DEFAULT_DENOISE_STEPS;
use crate::{HyperVector, NcaDenoiser, WeightedBundler};

/// Context encoding configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttentionConfig {
    /// Minimum resonance with the query for a token to be included;
    /// values `<= 0` include every token
    pub threshold: f64,

    /// Automaton steps applied to the bundled context
    pub denoise_steps: usize,
}

impl Default for AttentionConfig {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            denoise_steps: DEFAULT_DENOISE_STEPS,
        }
    }
}

impl AttentionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the resonance gate threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(-1.0, 1.0);
        self
    }

    /// Set the number of denoising steps
    pub fn with_denoise_steps(mut self, steps: usize) -> Self {
        self.denoise_steps = steps;
        self
    }
}

#[derive(Debug, Clone)]
pub struct HoloAttention {
    config: AttentionConfig,
    denoiser: NcaDenoiser,
}

impl HoloAttention {
    pub fn new(config: AttentionConfig) -> Self {
        Self {
            config,
            denoiser: NcaDenoiser::new(config.denoise_steps),
        }
    }

    /// Attention with the given gate threshold and default denoising
    pub fn with_threshold(threshold: f64) -> Self {
        Self::new(AttentionConfig::new().with_threshold(threshold))
    }

    pub fn config(&self) -> &AttentionConfig {
        &self.config
    }

    /// Build the context hologram for `sequence` as seen by `query`
    ///
    /// Returns the zero vector when no token passes the gate. Denoising the
    /// empty bundle would instead give all-ones, since ties set the bit and
    /// Rule 150 keeps all-ones fixed.
    pub fn build_context(&self, sequence: &[HyperVector], query: &HyperVector) -> HyperVector {
        let n = sequence.len();
        let mut bundler = WeightedBundler::new();

        for (i, token) in sequence.iter().enumerate() {
            if self.passes_gate(query, token) {
                let distance = (n - 1 - i) as isize;
                bundler.add(&token.permute(distance), 1);
            }
        }

        if bundler.is_empty() {
            return HyperVector::zeros();
        }

        self.denoiser.denoise(&bundler.build())
    }

    /// Bind the context hologram with the query
    pub fn attend(&self, sequence: &[HyperVector], query: &HyperVector) -> HyperVector {
        self.build_context(sequence, query).bind(query)
    }

    fn passes_gate(&self, query: &HyperVector, token: &HyperVector) -> bool {
        self.config.threshold <= 0.0 || query.resonance(token) >= self.config.threshold
    }
}

impl Default for HoloAttention {
    fn default() -> Self {
        Self::new(AttentionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(names: &[&str]) -> Vec<HyperVector> {
        names.iter().map(|n| HyperVector::from_seed(n)).collect()
    }

    #[test]
    fn test_single_token_without_denoising() {
        let attention = HoloAttention::new(AttentionConfig::new().with_denoise_steps(0));
        let seq = tokens(&["only"]);
        assert_eq!(attention.build_context(&seq, &seq[0]), seq[0]);
    }

    #[test]
    fn test_context_is_deterministic() {
        let attention = HoloAttention::default();
        let seq = tokens(&["the", "cat", "sat"]);
        let a = attention.build_context(&seq, &seq[2]);
        let b = attention.build_context(&seq, &seq[2]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_order_changes_context() {
        let attention = HoloAttention::default();
        let ab = tokens(&["a", "b", "c"]);
        let ba = tokens(&["b", "a", "c"]);
        let ctx_ab = attention.build_context(&ab, &ab[2]);
        let ctx_ba = attention.build_context(&ba, &ba[2]);
        assert_ne!(ctx_ab, ctx_ba);
    }

    #[test]
    fn test_gate_filters_unrelated_tokens() {
        let config = AttentionConfig::new().with_threshold(0.9).with_denoise_steps(0);
        let attention = HoloAttention::new(config);
        let seq = tokens(&["noise", "query"]);

        // Only the query itself resonates above 0.9; it sits at distance 0
        assert_eq!(attention.build_context(&seq, &seq[1]), seq[1]);
    }

    #[test]
    fn test_nothing_passes_gate() {
        let attention = HoloAttention::with_threshold(0.99);
        let seq = tokens(&["x", "y"]);
        let query = HyperVector::from_seed("z");
        assert_eq!(attention.build_context(&seq, &query), HyperVector::zeros());
        assert_eq!(attention.build_context(&[], &query), HyperVector::zeros());
        assert_eq!(attention.attend(&seq, &query), query);
    }

    #[test]
    fn test_attend_unbinds_query() {
        let attention = HoloAttention::default();
        let seq = tokens(&["red", "apple"]);
        let query = &seq[1];
        let context = attention.build_context(&seq, query);
        assert_eq!(attention.attend(&seq, query).bind(query), context);
    }

    #[test]
    fn test_config_clamps_threshold() {
        assert_eq!(AttentionConfig::new().with_threshold(3.0).threshold, 1.0);
        assert_eq!(AttentionConfig::default().denoise_steps, 2);
    }
}
