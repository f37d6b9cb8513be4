//! Threat Detector Core - feature extraction and classification pipeline.
//!
//! Accepts an executable image (raw bytes) or a URL string, extracts a
//! named feature set, scores it with a frozen ONNX classifier under a
//! strict feature-schema contract and assembles a normalized verdict.
//!
//! ## Architecture
//! - `entropy` - Shannon entropy over bytes and text
//! - `pe` - Portable Executable structure parsing
//! - `features` - executable and URL feature builders
//! - `model` - artifact loading, schema alignment, inference, fallback
//! - `verdict` - result assembly
//! - `engine` - `AnalysisEngine`, the injected core entry point
//! - `service` - bounded async facade for the route layer
//!
//! ## Usage
//! ```no_run
//! use threat_detector_core::{AnalysisEngine, ArtifactConfig};
//!
//! let engine = AnalysisEngine::load(&ArtifactConfig::default_probe());
//! let verdict = engine.analyze_url("https://bit.ly/2Vxn3ad").unwrap();
//! if verdict.malicious {
//!     println!("threat: {}", verdict.message);
//! }
//! ```
//!
//! Model artifacts are consumed read-only: a `<stem>.onnx` blob paired
//! with a `<stem>.meta.json` side-car naming the feature order, the class
//! list and the threat-class index. When no artifact pair loads, every
//! verdict is an explicitly flagged, benign-leaning fallback.

pub mod engine;
pub mod entropy;
pub mod error;
pub mod features;
pub mod model;
pub mod pe;
pub mod service;
pub mod verdict;

pub use engine::{AnalysisEngine, EngineStatus};
pub use error::AnalysisError;
pub use features::FeatureSet;
pub use model::{ArtifactConfig, FeatureSchema};
pub use service::AnalysisService;
pub use verdict::{AnalysisVerdict, InputFormat};
