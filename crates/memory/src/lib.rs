//! Associative memories built on bundled hypervector traces
//!
//! - [`TransitionMemory`]: one hologram of `key ⊕ value` traces, optionally
//!   filtered by the [`EntropyGate`]
//! - [`MultiScaleMemory`]: forward and backward n-gram stores of order 1-3
//!   with blended backoff prediction
//! - [`CleanupMemory`]: prototype table decoding noisy vectors to tokens

pub mod capacity;
pub mod cleanup;
pub mod config;
pub mod gate;
pub mod multiscale;
pub mod transition;

pub use cleanup::CleanupMemory;
pub use config::{GateConfig, MultiScaleConfig};
pub use gate::{EntropyGate, GateDecision};
pub use multiscale::MultiScaleMemory;
pub use transition::TransitionMemory;
