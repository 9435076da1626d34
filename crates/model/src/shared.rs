//! Thread-safe handle around a [`Model`]
//!
//! The model itself is single-threaded. Embedding is lazy, so even
//! prediction may insert into the vocabulary and takes the write lock;
//! read-only lookups share the read lock.

use std::sync::Arc;

use holo_core::Result;
use holo_hdc::HyperVector;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{Model, ModelState, Prediction};

#[derive(Debug, Clone, Default)]
pub struct SharedModel {
    inner: Arc<RwLock<Model>>,
}

impl SharedModel {
    pub fn new(model: Model) -> Self {
        Self {
            inner: Arc::new(RwLock::new(model)),
        }
    }

    pub fn learn_sentence<S: AsRef<str>>(&self, tokens: &[S]) {
        self.inner.write().learn_sentence(tokens);
    }

    pub fn predict_next<S: AsRef<str>>(&self, tokens: &[S]) -> String {
        self.inner.write().predict_next(tokens)
    }

    pub fn predict_next_scored<S: AsRef<str>>(&self, tokens: &[S]) -> Option<Prediction> {
        self.inner.write().predict_next_scored(tokens)
    }

    pub fn find_closest_concept(&self, vector: &HyperVector) -> String {
        self.inner.read().find_closest_concept(vector).to_string()
    }

    pub fn export_state(&self) -> ModelState {
        self.inner.read().export_state()
    }

    /// Replace the wrapped model with one rebuilt from `state`
    pub fn restore(&self, state: ModelState) -> Result<()> {
        let model = Model::from_state(state)?;
        *self.inner.write() = model;
        Ok(())
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Model> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Model> {
        self.inner.write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_concurrent_learning() {
        let shared = SharedModel::default();

        thread::scope(|scope| {
            for worker in 0..4 {
                let shared = shared.clone();
                scope.spawn(move || {
                    for i in 0..10 {
                        let a = format!("w{}-{}", worker, i);
                        let b = format!("w{}-{}", worker, i + 1);
                        shared.learn_sentence(&[a, b]);
                    }
                });
            }
        });

        assert_eq!(shared.read().association_count(), 40);
        assert_eq!(shared.predict_next(&["w2-3"]), "w2-4");
    }

    #[test]
    fn test_restore_replaces_model() {
        let shared = SharedModel::default();
        shared.learn_sentence(&["left", "right"]);
        let state = shared.export_state();

        let other = SharedModel::default();
        other.restore(state).unwrap();
        assert_eq!(other.predict_next(&["left"]), "right");
        assert_eq!(other.find_closest_concept(&HyperVector::from_seed("left")), "left");
    }
}
