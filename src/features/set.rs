//! FeatureSet - ordered name/value mapping handed to the classifier.
//!
//! Built fresh per request and discarded after classification. Insertion
//! order is preserved so logs and exports stay deterministic; lookup by
//! name is what schema alignment uses.

use std::collections::HashMap;

/// Ordered mapping from feature name to numeric value.
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    entries: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Insert a feature. Re-inserting an existing name overwrites the value
    /// but keeps its original position.
    pub fn insert(&mut self, name: &str, value: f64) {
        if let Some(&pos) = self.index.get(name) {
            self.entries[pos].1 = value;
        } else {
            self.index.insert(name.to_string(), self.entries.len());
            self.entries.push((name.to_string(), value));
        }
    }

    /// Convenience for 0/1-coded indicator features.
    pub fn insert_flag(&mut self, name: &str, value: bool) {
        self.insert(name, if value { 1.0 } else { 0.0 });
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.index.get(name).map(|&pos| self.entries[pos].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// JSON shape for debug logging.
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_count": self.len(),
            "values": self.entries.iter()
                .map(|(name, value)| (name.clone(), serde_json::Value::from(*value)))
                .collect::<serde_json::Map<String, serde_json::Value>>()
        })
    }
}

impl<'a> FromIterator<(&'a str, f64)> for FeatureSet {
    fn from_iter<T: IntoIterator<Item = (&'a str, f64)>>(iter: T) -> Self {
        let mut set = FeatureSet::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}
