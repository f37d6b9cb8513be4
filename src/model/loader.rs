//! Model artifact loader.
//!
//! Probes an ordered list of candidate directories for a classifier blob
//! (`<stem>.onnx`) paired with its schema side-car (`<stem>.meta.json`)
//! and loads the first pair that both exist and parse. Total failure is
//! recorded as `ModelState::Unavailable` - never raised - so the engine
//! degrades to fallback verdicts instead of refusing to start.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::classifier::{Classifier, OnnxClassifier};
use super::schema::FeatureSchema;

/// Artifact stem for the executable classifier pair.
pub const EXECUTABLE_MODEL_STEM: &str = "pe_classifier";
/// Artifact stem for the URL classifier pair.
pub const URL_MODEL_STEM: &str = "url_classifier";

/// Environment variable overriding the probe list.
pub const MODEL_DIR_ENV: &str = "THREAT_MODEL_DIR";

/// Ordered candidate directories for artifact probing.
#[derive(Debug, Clone, Default)]
pub struct ArtifactConfig {
    pub search_dirs: Vec<PathBuf>,
}

impl ArtifactConfig {
    /// Default probe order: env override, `./models`, then the per-user
    /// data directory.
    pub fn default_probe() -> Self {
        let mut search_dirs = Vec::new();
        if let Ok(dir) = std::env::var(MODEL_DIR_ENV) {
            if !dir.is_empty() {
                search_dirs.push(PathBuf::from(dir));
            }
        }
        search_dirs.push(PathBuf::from("models"));
        if let Some(data_dir) = dirs::data_dir() {
            search_dirs.push(data_dir.join("threat-detector").join("models"));
        }
        Self { search_dirs }
    }

    pub fn single_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            search_dirs: vec![dir.into()],
        }
    }
}

/// A successfully loaded classifier plus its schema.
pub struct LoadedModel {
    pub classifier: Box<dyn Classifier>,
    pub schema: FeatureSchema,
    pub model_path: PathBuf,
    pub loaded_at: DateTime<Utc>,
}

/// Load outcome for one artifact pair. Immutable after load.
pub enum ModelState {
    Loaded(LoadedModel),
    Unavailable { reason: String },
}

impl ModelState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ModelState::Loaded(_))
    }

    pub fn schema_hash(&self) -> Option<u32> {
        match self {
            ModelState::Loaded(m) => Some(m.schema.schema_hash()),
            ModelState::Unavailable { .. } => None,
        }
    }
}

/// Probe the configured directories for the `<stem>` artifact pair.
///
/// A directory where only one of the two files exists, or where either
/// fails to load, is logged and skipped; probing continues down the list.
pub fn load_model(config: &ArtifactConfig, stem: &str) -> ModelState {
    for dir in &config.search_dirs {
        let model_path = dir.join(format!("{}.onnx", stem));
        let meta_path = dir.join(format!("{}.meta.json", stem));

        if !model_path.is_file() || !meta_path.is_file() {
            continue;
        }

        match try_load_pair(&model_path, &meta_path) {
            Ok(loaded) => {
                log::info!(
                    "{}: loaded classifier from {} ({} features, {} classes, schema {:08x})",
                    stem,
                    model_path.display(),
                    loaded.schema.feature_count(),
                    loaded.schema.class_count(),
                    loaded.schema.schema_hash(),
                );
                return ModelState::Loaded(loaded);
            }
            Err(reason) => {
                log::warn!("{}: artifact pair at {} unusable: {}", stem, dir.display(), reason);
            }
        }
    }

    let reason = format!("no usable {} artifact pair in probe path", stem);
    log::warn!("{}; fallback verdicts will be served", reason);
    ModelState::Unavailable { reason }
}

fn try_load_pair(model_path: &Path, meta_path: &Path) -> Result<LoadedModel, String> {
    // Schema first: a malformed side-car makes the model useless anyway.
    let schema = FeatureSchema::from_json_file(meta_path).map_err(|e| e.to_string())?;
    let classifier = OnnxClassifier::from_file(model_path).map_err(|e| e.to_string())?;

    Ok(LoadedModel {
        classifier: Box::new(classifier),
        schema,
        model_path: model_path.to_path_buf(),
        loaded_at: Utc::now(),
    })
}
