//! Cellular-automaton smoothing of bundled hypervectors
//!
//! A 1-D binary automaton with cyclic boundary running Rule 150:
//! `next[i] = v[i-1] ^ v[i] ^ v[i+1]`. Heavy bundling leaves isolated
//! flipped bits; a few steps spread them out. The transform is a lossy
//! heuristic and does not reconstruct any particular original vector.

use crate::HyperVector;

/// Default number of automaton steps applied by context building
pub const DEFAULT_DENOISE_STEPS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NcaDenoiser {
    steps: usize,
}

impl NcaDenoiser {
    pub fn new(steps: usize) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Run the automaton for the configured number of steps
    pub fn denoise(&self, v: &HyperVector) -> HyperVector {
        let mut current = v.clone();
        for _ in 0..self.steps {
            current = Self::step(&current);
        }
        current
    }

    /// One Rule 150 update
    pub fn step(v: &HyperVector) -> HyperVector {
        let mut next = v.permute(1);
        next.bind_assign(v);
        next.bind_assign(&v.permute(-1));
        next
    }
}

impl Default for NcaDenoiser {
    fn default() -> Self {
        Self::new(DEFAULT_DENOISE_STEPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DIMENSION;

    #[test]
    fn test_zero_steps_is_identity() {
        let v = HyperVector::from_seed("identity");
        assert_eq!(NcaDenoiser::new(0).denoise(&v), v);
    }

    #[test]
    fn test_single_cell_spreads() {
        let mut v = HyperVector::zeros();
        v.set(10, true);

        let next = NcaDenoiser::step(&v);
        assert_eq!(next.count_ones(), 3);
        assert_eq!(next.get(9), Some(true));
        assert_eq!(next.get(10), Some(true));
        assert_eq!(next.get(11), Some(true));
    }

    #[test]
    fn test_cyclic_boundary() {
        let mut v = HyperVector::zeros();
        v.set(0, true);

        let next = NcaDenoiser::step(&v);
        assert_eq!(next.get(DIMENSION - 1), Some(true));
        assert_eq!(next.get(1), Some(true));
    }

    #[test]
    fn test_rule_is_linear() {
        let a = HyperVector::from_seed("a");
        let b = HyperVector::from_seed("b");
        let denoiser = NcaDenoiser::default();

        let lhs = denoiser.denoise(&a.bind(&b));
        let rhs = denoiser.denoise(&a).bind(&denoiser.denoise(&b));
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn test_deterministic() {
        let v = HyperVector::from_seed("noise");
        let denoiser = NcaDenoiser::new(5);
        assert_eq!(denoiser.denoise(&v), denoiser.denoise(&v));
    }
}
