//! Model Module - scoring path
//!
//! Likelihood normalization, the opaque reconstruction scorer, and the
//! threshold classifier sitting behind it.

pub mod classify;
pub mod normalize;
pub mod scorer;

// Re-export common types
pub use classify::{Classifier, ThresholdPolarity};
pub use normalize::LikelihoodNormalizer;
pub use scorer::{OnnxScorer, Scorer};

use thiserror::Error;

/// Failures inside one scoring cycle. None of these are fatal to the
/// worker: the cycle is aborted, the buffer is preserved, and the next
/// admission scores normally.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("tensor shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("ragged batch: row {row} has {got} features, expected {expected}")]
    RaggedBatch {
        row: usize,
        got: usize,
        expected: usize,
    },
}
