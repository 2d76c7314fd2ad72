//! Likelihood normalization
//!
//! Deterministic, stateless transform of aggregate likelihoods into the
//! tensor the scorer expects, parameterized by one calibration constant
//! fixed at startup (the maximum windowed likelihood seen in training).

use ndarray::Array3;

use super::ScoreError;

pub struct LikelihoodNormalizer {
    global_max: f32,
}

impl LikelihoodNormalizer {
    pub fn new(global_max: f32) -> Self {
        Self {
            global_max: global_max.max(1e-8),
        }
    }

    /// Normalize a single likelihood vector into a batch-of-one tensor of
    /// shape `(1, len, 1)`. The scorer requires a consistent rank, so a
    /// bare vector always gains an explicit minibatch dimension.
    pub fn transform(&self, likelihoods: &[f32]) -> Result<Array3<f32>, ScoreError> {
        self.transform_batch(std::slice::from_ref(&likelihoods))
    }

    /// Normalize a batch of likelihood vectors into a `(batch, len, 1)`
    /// tensor. Rows must all have the same length.
    pub fn transform_batch<R: AsRef<[f32]>>(&self, batch: &[R]) -> Result<Array3<f32>, ScoreError> {
        let rows = batch.len();
        let len = batch.first().map(|r| r.as_ref().len()).unwrap_or(0);

        let mut data = Vec::with_capacity(rows * len);
        for (row, values) in batch.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != len {
                return Err(ScoreError::RaggedBatch {
                    row,
                    got: values.len(),
                    expected: len,
                });
            }
            data.extend(values.iter().map(|v| v / self.global_max));
        }

        Array3::from_shape_vec((rows, len, 1), data)
            .map_err(|e| ScoreError::Inference(format!("tensor build error: {}", e)))
    }
}
