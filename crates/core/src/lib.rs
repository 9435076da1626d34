//! Core error types and identifiers shared by the holographic memory crates

pub mod types;

pub use types::{ModelId, UNKNOWN_TOKEN};

/// Core error types
#[derive(thiserror::Error, Debug)]
pub enum HoloError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),

    #[error("Dimension mismatch: expected {expected} bits, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HoloError>;
