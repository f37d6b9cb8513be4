//! Classification adapter.
//!
//! Bridges a named feature set and the loaded model: align to the schema,
//! query, decode into plain numbers. When the model is unavailable - or an
//! inference call fails at runtime - the adapter serves a neutral,
//! benign-leaning fallback that is explicitly flagged, never an exception.

use std::collections::BTreeMap;

use super::loader::{LoadedModel, ModelState};
use super::schema::FeatureSchema;
use crate::features::FeatureSet;

/// Class names used when no schema is available (fallback path).
const FALLBACK_CLASSES: [&str; 2] = ["benign", "malicious"];

/// Benign-leaning probability assigned in the fallback verdict.
const FALLBACK_BENIGN_PROBABILITY: f64 = 0.55;

/// Tolerance for treating a raw output vector as already normalized.
const PROBABILITY_SUM_TOLERANCE: f64 = 1e-3;

/// Fully decoded model answer; every value is a plain float/bool/string.
#[derive(Debug, Clone)]
pub struct DecodedPrediction {
    pub predicted_class: String,
    pub malicious: bool,
    /// Probability at the predicted index.
    pub confidence: f64,
    /// Probability at the designated threat index.
    pub threat_probability: f64,
    pub probabilities: BTreeMap<String, f64>,
    pub is_fallback: bool,
}

/// Classify an aligned feature set against the model state.
///
/// Never fails: an unavailable model or a runtime inference error both
/// degrade to the flagged fallback prediction.
pub fn classify(state: &ModelState, features: &FeatureSet) -> DecodedPrediction {
    match state {
        ModelState::Unavailable { reason } => {
            log::debug!("serving fallback prediction: {}", reason);
            fallback_prediction()
        }
        ModelState::Loaded(model) => match query(model, features) {
            Ok(decoded) => decoded,
            Err(e) => {
                log::warn!("inference failed ({}), serving fallback prediction", e);
                fallback_prediction()
            }
        },
    }
}

fn query(model: &LoadedModel, features: &FeatureSet) -> Result<DecodedPrediction, String> {
    let row = model.schema.align(features);
    let raw = model
        .classifier
        .predict(&row)
        .map_err(|e| e.to_string())?;
    decode(&model.schema, &raw.scores)
}

/// Decode a raw score vector against the schema's class list.
pub fn decode(schema: &FeatureSchema, raw: &[f64]) -> Result<DecodedPrediction, String> {
    let class_count = schema.class_count();
    if raw.len() < class_count {
        return Err(format!(
            "model returned {} scores for {} classes",
            raw.len(),
            class_count
        ));
    }

    let probabilities = normalize_scores(&raw[..class_count]);

    let mut predicted = 0usize;
    for (i, &p) in probabilities.iter().enumerate() {
        if p > probabilities[predicted] {
            predicted = i;
        }
    }

    let by_class: BTreeMap<String, f64> = schema
        .classes
        .iter()
        .cloned()
        .zip(probabilities.iter().copied())
        .collect();

    Ok(DecodedPrediction {
        predicted_class: schema.classes[predicted].clone(),
        malicious: predicted == schema.threat_class_index,
        confidence: probabilities[predicted],
        threat_probability: probabilities[schema.threat_class_index],
        probabilities: by_class,
        is_fallback: false,
    })
}

/// Accept the vector as-is when it already sums to ~1 with no negative
/// entries; otherwise treat it as logits and apply a softmax.
fn normalize_scores(raw: &[f64]) -> Vec<f64> {
    let sum: f64 = raw.iter().sum();
    let well_formed = raw.iter().all(|&v| (0.0..=1.0).contains(&v))
        && (sum - 1.0).abs() <= PROBABILITY_SUM_TOLERANCE;
    if well_formed {
        return raw.to_vec();
    }

    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = raw.iter().map(|&v| (v - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

/// Neutral, benign-leaning answer served while the model is unavailable.
pub fn fallback_prediction() -> DecodedPrediction {
    let probabilities: BTreeMap<String, f64> = [
        (FALLBACK_CLASSES[0].to_string(), FALLBACK_BENIGN_PROBABILITY),
        (FALLBACK_CLASSES[1].to_string(), 1.0 - FALLBACK_BENIGN_PROBABILITY),
    ]
    .into_iter()
    .collect();

    DecodedPrediction {
        predicted_class: FALLBACK_CLASSES[0].to_string(),
        malicious: false,
        confidence: FALLBACK_BENIGN_PROBABILITY,
        threat_probability: 1.0 - FALLBACK_BENIGN_PROBABILITY,
        probabilities,
        is_fallback: true,
    }
}
