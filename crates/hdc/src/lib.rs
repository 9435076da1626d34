//! Hyperdimensional Computing (HDC) primitives for associative memory
//!
//! Tokens are represented as fixed-width binary hypervectors. Associations
//! are formed by binding (XOR), order is encoded by permutation (cyclic
//! shift) and many vectors are superposed by weighted majority voting.

pub mod attention;
pub mod bundler;
pub mod denoiser;
pub mod encoder;
pub mod hypervector;
pub mod operations;
pub mod similarity;
pub mod simd;

pub use attention::{AttentionConfig, HoloAttention};
pub use bundler::WeightedBundler;
pub use denoiser::NcaDenoiser;
pub use hypervector::HyperVector;
pub use operations::{bind, bundle, permute};
pub use similarity::resonance;

/// Width of every hypervector in bits
pub const DIMENSION: usize = 10_000;
