//! Holographic language model
//!
//! Tokens are embedded as seeded hypervectors. Learning a sentence records,
//! for every position, the holographic context of the preceding tokens and
//! the token that followed. Prediction encodes the query context the same
//! way and returns the token of the most resonant recorded context.
//!
//! Associations are kept as an exact flat list rather than bundled, so the
//! model never forgets and recall does not degrade with size; the cost is a
//! linear scan per prediction.

pub mod config;
pub mod shared;
pub mod snapshot;
pub mod state;

use std::io::{Read, Write};

use holo_core::{ModelId, Result, UNKNOWN_TOKEN};
use holo_hdc::similarity::first_best;
use holo_hdc::simd::{batch_resonances, parallel_batch_resonances};
use holo_hdc::{AttentionConfig, HoloAttention, HyperVector};
use holo_memory::CleanupMemory;
use tracing::debug;

pub use config::ModelConfig;
pub use shared::SharedModel;
pub use snapshot::SnapshotHeader;
pub use state::{Association, ModelState};

/// Association count from which prediction scans run on the rayon pool
pub const PARALLEL_SCAN_MIN: usize = 1024;

/// A predicted token with the resonance of its winning context
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub token: String,
    pub resonance: f64,
}

#[derive(Debug, Clone)]
pub struct Model {
    id: ModelId,
    config: ModelConfig,
    embeddings: CleanupMemory,
    associations: Vec<Association>,
    attention: HoloAttention,
}

impl Model {
    /// Create an empty model
    pub fn new(config: ModelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_parts(ModelId::new(), config, CleanupMemory::new(), Vec::new()))
    }

    fn with_parts(
        id: ModelId,
        config: ModelConfig,
        embeddings: CleanupMemory,
        associations: Vec<Association>,
    ) -> Self {
        let attention =
            HoloAttention::new(AttentionConfig::new().with_threshold(config.resonance_threshold));
        Self {
            id,
            config,
            embeddings,
            associations,
            attention,
        }
    }

    pub fn id(&self) -> ModelId {
        self.id
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn embeddings(&self) -> &CleanupMemory {
        &self.embeddings
    }

    pub fn associations(&self) -> &[Association] {
        &self.associations
    }

    pub fn vocabulary_size(&self) -> usize {
        self.embeddings.len()
    }

    pub fn association_count(&self) -> usize {
        self.associations.len()
    }

    /// Vector for `token`, created from its seed on first use
    pub fn embed(&mut self, token: &str) -> HyperVector {
        if let Some(vector) = self.embeddings.get(token) {
            return vector.clone();
        }
        let vector = HyperVector::from_seed(token);
        self.embeddings.insert(token, vector.clone());
        vector
    }

    /// Record one association per position after the first
    pub fn learn_sentence<S: AsRef<str>>(&mut self, tokens: &[S]) {
        let vectors: Vec<HyperVector> = tokens.iter().map(|t| self.embed(t.as_ref())).collect();

        for i in 1..vectors.len() {
            let start = i.saturating_sub(self.config.context_window);
            let context = self.attention.build_context(&vectors[start..i], &vectors[i - 1]);
            self.associations.push(Association {
                context,
                next_token: tokens[i].as_ref().to_string(),
                next_vector: vectors[i].clone(),
            });
        }

        debug!(
            model = %self.id,
            tokens = tokens.len(),
            associations = self.associations.len(),
            "learned sentence"
        );
    }

    /// Most likely next token, or [`UNKNOWN_TOKEN`] when nothing can be predicted
    pub fn predict_next<S: AsRef<str>>(&mut self, tokens: &[S]) -> String {
        self.predict_next_scored(tokens)
            .map(|prediction| prediction.token)
            .unwrap_or_else(|| UNKNOWN_TOKEN.to_string())
    }

    /// Most likely next token with its resonance
    ///
    /// `None` for an empty context or a model with no associations. Among
    /// equally resonant contexts the first learned one wins.
    pub fn predict_next_scored<S: AsRef<str>>(&mut self, tokens: &[S]) -> Option<Prediction> {
        if tokens.is_empty() {
            return None;
        }

        let vectors: Vec<HyperVector> = tokens.iter().map(|t| self.embed(t.as_ref())).collect();
        if self.associations.is_empty() {
            return None;
        }

        let start = vectors.len().saturating_sub(self.config.context_window);
        let query = &vectors[vectors.len() - 1];
        let context = self.attention.build_context(&vectors[start..], query);

        let scores = self.scan(&context);
        let (idx, resonance) = first_best(&scores)?;
        let token = self.associations.get(idx)?.next_token.clone();
        Some(Prediction { token, resonance })
    }

    /// Token whose embedding resonates most with `vector`
    ///
    /// Ties go to the lexicographically smallest token; [`UNKNOWN_TOKEN`]
    /// when nothing has been embedded yet.
    pub fn find_closest_concept(&self, vector: &HyperVector) -> &str {
        self.embeddings
            .best_match(vector)
            .map(|(token, _)| token)
            .unwrap_or(UNKNOWN_TOKEN)
    }

    /// Snapshot of the model's learnable state
    pub fn export_state(&self) -> ModelState {
        ModelState {
            embeddings: self
                .embeddings
                .iter()
                .map(|(token, vector)| (token.to_string(), vector.clone()))
                .collect(),
            associations: self.associations.clone(),
            context_window: self.config.context_window,
            resonance_threshold: self.config.resonance_threshold,
        }
    }

    /// Rebuild a model from exported state
    pub fn from_state(state: ModelState) -> Result<Self> {
        Self::restore(ModelId::new(), state)
    }

    fn restore(id: ModelId, state: ModelState) -> Result<Self> {
        let config = state.config();
        config.validate()?;

        let mut embeddings = CleanupMemory::new();
        for (token, vector) in state.embeddings {
            embeddings.insert(token, vector);
        }

        debug!(
            model = %id,
            vocabulary = embeddings.len(),
            associations = state.associations.len(),
            "restored model state"
        );
        Ok(Self::with_parts(id, config, embeddings, state.associations))
    }

    /// Write a versioned snapshot
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let header = SnapshotHeader::new(self.id);
        snapshot::write_snapshot(writer, &header, &self.export_state())?;
        debug!(model = %self.id, associations = self.associations.len(), "wrote snapshot");
        Ok(())
    }

    /// Read a snapshot written by [`Model::write_to`], keeping its model id
    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        let (header, state) = snapshot::read_snapshot(reader)?;
        Self::restore(header.model_id, state)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::read_from(bytes)
    }

    fn scan(&self, context: &HyperVector) -> Vec<f64> {
        let stored = self.associations.iter().map(|a| &a.context);
        if self.associations.len() < PARALLEL_SCAN_MIN {
            batch_resonances(context, stored)
        } else {
            let stored: Vec<&HyperVector> = stored.collect();
            parallel_batch_resonances(context, &stored)
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::with_parts(
            ModelId::new(),
            ModelConfig::default(),
            CleanupMemory::new(),
            Vec::new(),
        )
    }
}
