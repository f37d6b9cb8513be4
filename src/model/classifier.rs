//! Classifier trait and the ONNX Runtime implementation.
//!
//! The engine only ever sees the trait: a single-row predict returning a
//! raw probability (or logit) vector. Keeps the ort types out of every
//! result and makes the inference backend swappable in tests.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

/// Raw model output for one input row.
#[derive(Debug, Clone)]
pub struct Prediction {
    /// Per-class scores in model output order. May be logits; the adapter
    /// normalizes before decoding.
    pub scores: Vec<f64>,
}

#[derive(Debug)]
pub struct InferenceError(pub String);

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InferenceError: {}", self.0)
    }
}

impl std::error::Error for InferenceError {}

/// Fixed interface over the frozen classifier. One implementation per
/// underlying model format.
pub trait Classifier: Send + Sync {
    fn predict(&self, row: &[f32]) -> Result<Prediction, InferenceError>;
}

/// ONNX-backed classifier.
///
/// The session is behind a mutex because `ort` requires `&mut` to run;
/// the model itself is never mutated after load.
pub struct OnnxClassifier {
    session: Mutex<Session>,
}

impl OnnxClassifier {
    pub fn from_file(path: &Path) -> Result<Self, InferenceError> {
        let session = Session::builder()
            .map_err(|e| InferenceError(format!("session builder error: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError(format!("optimization error: {}", e)))?
            .commit_from_file(path)
            .map_err(|e| InferenceError(format!("failed to load model: {}", e)))?;

        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, row: &[f32]) -> Result<Prediction, InferenceError> {
        let mut session = self.session.lock();

        let input_array = Array2::<f32>::from_shape_vec((1, row.len()), row.to_vec())
            .map_err(|e| InferenceError(format!("input shape error: {}", e)))?;
        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError(format!("tensor error: {}", e)))?;

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        if output_names.is_empty() {
            return Err(InferenceError("model defines no outputs".into()));
        }

        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError(format!("inference failed: {}", e)))?;

        // Classifiers exported from training pipelines often emit a label
        // tensor first and the probability tensor last; scan from the back
        // for the first float output.
        for name in output_names.iter().rev() {
            let Some(value) = outputs.get(name) else {
                continue;
            };
            let Ok(tensor) = value.try_extract_tensor::<f32>() else {
                continue;
            };
            let data = tensor.1;
            if !data.is_empty() {
                return Ok(Prediction {
                    scores: data.iter().map(|&v| v as f64).collect(),
                });
            }
        }

        Err(InferenceError("no float output tensor found".into()))
    }
}
