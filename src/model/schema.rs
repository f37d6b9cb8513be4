//! FeatureSchema - the contract between extractor and classifier.
//!
//! Loaded once from the artifact's side-car metadata and immutable for the
//! process lifetime. Alignment reorders a feature set into the exact column
//! order the model was trained on: missing features become 0, unknown ones
//! are dropped.

use std::fs;
use std::path::Path;

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::features::FeatureSet;

/// Ordered feature names plus class metadata for one classifier artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSchema {
    /// Exact column order the classifier expects.
    pub feature_names: Vec<String>,
    /// Class names in model output order.
    pub classes: Vec<String>,
    /// Index of the malicious/phishing class within `classes`.
    pub threat_class_index: usize,
}

#[derive(Debug, Clone)]
pub enum SchemaError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaError::Io(e) => write!(f, "schema read error: {}", e),
            SchemaError::Parse(e) => write!(f, "schema parse error: {}", e),
            SchemaError::Invalid(e) => write!(f, "schema invalid: {}", e),
        }
    }
}

impl std::error::Error for SchemaError {}

impl FeatureSchema {
    /// Load and validate a schema from its JSON side-car file.
    pub fn from_json_file(path: &Path) -> Result<Self, SchemaError> {
        let data = fs::read_to_string(path).map_err(|e| SchemaError::Io(e.to_string()))?;
        let schema: FeatureSchema =
            serde_json::from_str(&data).map_err(|e| SchemaError::Parse(e.to_string()))?;
        schema.validate()?;
        Ok(schema)
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.feature_names.is_empty() {
            return Err(SchemaError::Invalid("empty feature name list".into()));
        }
        if self.classes.len() < 2 {
            return Err(SchemaError::Invalid("need at least two classes".into()));
        }
        if self.threat_class_index >= self.classes.len() {
            return Err(SchemaError::Invalid(format!(
                "threat class index {} out of range for {} classes",
                self.threat_class_index,
                self.classes.len()
            )));
        }
        Ok(())
    }

    /// CRC32 over the ordered feature names, for compatibility diagnostics.
    pub fn schema_hash(&self) -> u32 {
        let mut hasher = Hasher::new();
        for name in &self.feature_names {
            hasher.update(name.as_bytes());
            hasher.update(&[0]); // separator
        }
        hasher.finalize()
    }

    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn threat_class(&self) -> &str {
        &self.classes[self.threat_class_index]
    }

    /// Reorder a feature set into schema column order. Schema features
    /// absent from the input become 0.0; input features not in the schema
    /// are dropped.
    pub fn align(&self, features: &FeatureSet) -> Vec<f32> {
        self.feature_names
            .iter()
            .map(|name| features.get(name).unwrap_or(0.0) as f32)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> FeatureSchema {
        FeatureSchema {
            feature_names: vec!["b".into(), "a".into(), "missing".into()],
            classes: vec!["benign".into(), "malware".into()],
            threat_class_index: 1,
        }
    }

    #[test]
    fn test_align_reorders_zero_fills_and_drops() {
        let mut features = FeatureSet::new();
        features.insert("a", 1.5);
        features.insert("b", 2.5);
        features.insert("extra", 99.0);

        let row = sample_schema().align(&features);
        assert_eq!(row, vec![2.5, 1.5, 0.0]);
    }

    #[test]
    fn test_hash_depends_on_order() {
        let schema = sample_schema();
        let mut reordered = schema.clone();
        reordered.feature_names.swap(0, 1);
        assert_ne!(schema.schema_hash(), reordered.schema_hash());
        assert_eq!(schema.schema_hash(), sample_schema().schema_hash());
    }

    #[test]
    fn test_validate_rejects_bad_threat_index() {
        let mut schema = sample_schema();
        schema.threat_class_index = 5;
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_single_class() {
        let mut schema = sample_schema();
        schema.classes = vec!["benign".into()];
        schema.threat_class_index = 0;
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(
            &path,
            r#"{"feature_names": ["x", "y"], "classes": ["benign", "phishing"], "threat_class_index": 1}"#,
        )
        .unwrap();

        let schema = FeatureSchema::from_json_file(&path).unwrap();
        assert_eq!(schema.feature_count(), 2);
        assert_eq!(schema.threat_class(), "phishing");
    }

    #[test]
    fn test_from_json_file_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, "not json at all").unwrap();
        assert!(matches!(
            FeatureSchema::from_json_file(&path),
            Err(SchemaError::Parse(_))
        ));
    }
}
