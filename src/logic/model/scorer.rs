//! Reconstruction scorer - ONNX Runtime integration
//!
//! The scorer is an opaque deterministic function approximating its own
//! input; anomaly scoring happens downstream via reconstruction error.
//! Kept behind a trait so the pipeline can run against any engine.

use std::path::Path;

use ndarray::Array3;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;

use super::ScoreError;

/// Deterministic, shape-preserving mapping from a normalized tensor to its
/// reconstruction.
pub trait Scorer: Send {
    fn reconstruct(&mut self, input: &Array3<f32>) -> Result<Array3<f32>, ScoreError>;
}

/// ONNX-backed scorer (LSTM autoencoder), loaded once at startup. Model
/// weights and architecture are supplied externally and never inspected.
pub struct OnnxScorer {
    session: Session,
}

impl OnnxScorer {
    pub fn load(model_path: &Path) -> Result<Self, ScoreError> {
        tracing::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(ScoreError::ModelLoad(format!(
                "model not found: {}",
                model_path.display()
            )));
        }

        let session = Session::builder()
            .map_err(|e| ScoreError::ModelLoad(format!("session builder error: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ScoreError::ModelLoad(format!("optimization error: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| ScoreError::ModelLoad(format!("failed to load model: {}", e)))?;

        tracing::info!("ONNX model loaded successfully");

        Ok(Self { session })
    }
}

impl Scorer for OnnxScorer {
    fn reconstruct(&mut self, input: &Array3<f32>) -> Result<Array3<f32>, ScoreError> {
        let output_name = self
            .session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| ScoreError::Inference("model defines no output".to_string()))?;

        let input_tensor = Value::from_array(input.clone())
            .map_err(|e| ScoreError::Inference(format!("tensor error: {}", e)))?;

        let outputs = self
            .session
            .run(ort::inputs![input_tensor])
            .map_err(|e| ScoreError::Inference(format!("inference failed: {}", e)))?;

        let output = outputs
            .get(&output_name)
            .ok_or_else(|| ScoreError::Inference("no output produced".to_string()))?;

        let (shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| ScoreError::Inference(format!("extract error: {}", e)))?;

        let dims: Vec<usize> = shape.iter().map(|&d| d as usize).collect();
        if dims != input.shape() {
            return Err(ScoreError::ShapeMismatch {
                expected: input.shape().to_vec(),
                got: dims,
            });
        }

        Array3::from_shape_vec((dims[0], dims[1], dims[2]), data.to_vec())
            .map_err(|e| ScoreError::Inference(format!("reconstruction build error: {}", e)))
    }
}
