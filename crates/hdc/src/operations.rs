//! Core HDC operations: bind, bundle, permute
//!
//! These operations form the algebra of hyperdimensional computing:
//! - BIND: XOR, self-inverse association (A ⊕ (A ⊕ B) = B)
//! - BUNDLE: majority vote, a vector similar to all of its inputs
//! - PERMUTE: cyclic rotation, a dissimilar but reversible transformation

use crate::{HyperVector, WeightedBundler};

/// Bind two hypervectors together using XOR
pub fn bind(a: &HyperVector, b: &HyperVector) -> HyperVector {
    a.bind(b)
}

/// Bind multiple hypervectors together
///
/// The zero vector is the identity of XOR, so an empty slice binds to zeros.
pub fn bind_multiple(vectors: &[HyperVector]) -> HyperVector {
    let mut result = HyperVector::zeros();
    for v in vectors {
        result.bind_assign(v);
    }
    result
}

/// Unbind a value from a bound vector
///
/// Given C = A ⊕ B, retrieve B by computing C ⊕ A
pub fn unbind(bound: &HyperVector, key: &HyperVector) -> HyperVector {
    bind(bound, key)
}

/// Bundle hypervectors with equal weight
///
/// Ties (possible with an even count) set the bit. An empty slice yields
/// the zero vector.
pub fn bundle(vectors: &[HyperVector]) -> HyperVector {
    if vectors.is_empty() {
        return HyperVector::zeros();
    }

    let mut bundler = WeightedBundler::new();
    for v in vectors {
        bundler.add(v, 1);
    }
    bundler.build()
}

/// Permute a hypervector by rotating bits
pub fn permute(v: &HyperVector, positions: isize) -> HyperVector {
    v.permute(positions)
}

/// Role-filler binding: `permute(role, 1) ⊕ filler`
///
/// A plain `role ⊕ filler` is symmetric. Rotating the role first keeps
/// `encode_relation(a, b)` distinct from `encode_relation(b, a)`.
pub fn encode_relation(role: &HyperVector, filler: &HyperVector) -> HyperVector {
    permute(role, 1).bind(filler)
}

/// Recover the filler of a relation trace given its role
pub fn query_relation(trace: &HyperVector, role: &HyperVector) -> HyperVector {
    unbind(trace, &permute(role, 1))
}
