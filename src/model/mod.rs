//! Model artifacts and classification.
//!
//! The classifier is consumed as a frozen ONNX artifact paired with a JSON
//! side-car describing its feature schema. `loader` probes an ordered path
//! list once per process; `adapter` aligns feature sets to the schema,
//! queries the model and decodes the output - or serves an explicitly
//! flagged fallback when no artifact could be loaded.

pub mod adapter;
pub mod classifier;
pub mod loader;
pub mod schema;

pub use adapter::{classify, DecodedPrediction};
pub use classifier::{Classifier, InferenceError, OnnxClassifier, Prediction};
pub use loader::{ArtifactConfig, LoadedModel, ModelState};
pub use schema::FeatureSchema;
