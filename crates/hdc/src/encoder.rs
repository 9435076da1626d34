//! Permutation-encoded n-gram keys
//!
//! A forward key of order `n` for the window ending at position `t` binds
//! the last `n` tokens, each rotated by its distance to the predicted slot:
//!
//! ```text
//! key = ⊕_{i in 0..n} permute(seq[t - (n-1-i)], n - i)
//! ```
//!
//! so the nearest token is always rotated by 1, the one before it by 2 and so
//! on. Keys of different orders therefore never share a rotation pattern.
//! Backward keys mirror this: the token right after the predicted slot is
//! rotated by 1, the next by 2.

use crate::HyperVector;

/// Highest n-gram order supported by the multi-scale memory
pub const MAX_ORDER: usize = 3;

/// Key for predicting `seq[t + 1]` from the `order` tokens ending at `t`
///
/// Returns `None` when fewer than `order` tokens end at `t` or `t` is out of range.
pub fn forward_key(seq: &[HyperVector], t: usize, order: usize) -> Option<HyperVector> {
    if order == 0 || t >= seq.len() || t + 1 < order {
        return None;
    }

    let mut key = HyperVector::zeros();
    for i in 0..order {
        let idx = t - (order - 1 - i);
        key.bind_assign(&seq[idx].permute((order - i) as isize));
    }
    Some(key)
}

/// Key for predicting `seq[t - 1]` from the `order` tokens starting at `t`
pub fn backward_key(seq: &[HyperVector], t: usize, order: usize) -> Option<HyperVector> {
    if order == 0 || t + order > seq.len() {
        return None;
    }

    let mut key = HyperVector::zeros();
    for j in 0..order {
        key.bind_assign(&seq[t + j].permute((j + 1) as isize));
    }
    Some(key)
}

/// Forward key built from the tail of a context (predicts what follows it)
pub fn context_key(context: &[HyperVector], order: usize) -> Option<HyperVector> {
    let t = context.len().checked_sub(1)?;
    forward_key(context, t, order)
}

/// Backward key built from the head of a following sequence (predicts what precedes it)
pub fn following_key(following: &[HyperVector], order: usize) -> Option<HyperVector> {
    backward_key(following, 0, order)
}
