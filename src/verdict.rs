//! AnalysisVerdict - the normalized result record.
//!
//! One uniform shape regardless of input format; the format-specific parts
//! (file digest/size, normalized URL) ride along as optional metadata.
//! Everything serializes through serde with plain numbers only.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::model::DecodedPrediction;

/// Input format of an analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Executable,
    Url,
}

impl InputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputFormat::Executable => "executable",
            InputFormat::Url => "url",
        }
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Executable metadata echoed in the verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMetadata {
    pub file_name: String,
    pub file_size: u64,
    /// SHA-256 of the whole byte stream, lowercase hex.
    pub sha256: String,
}

/// URL metadata echoed in the verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlMetadata {
    pub url: String,
    pub normalized_url: String,
}

/// Final verdict record returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisVerdict {
    pub scan_id: String,
    pub analyzed_at: DateTime<Utc>,
    pub format: InputFormat,
    pub malicious: bool,
    pub predicted_class: String,
    /// Probability of the predicted class, in [0, 1].
    pub confidence: f64,
    /// Probability of the designated threat class.
    pub threat_probability: f64,
    /// Class name -> probability; sums to ~1.
    pub probabilities: BTreeMap<String, f64>,
    /// True when the classifier was unavailable and this is the degraded,
    /// benign-leaning answer.
    pub is_fallback: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<UrlMetadata>,
}

/// Compute the metadata block for an uploaded executable. A missing file
/// name is derived from the digest.
pub fn file_metadata(bytes: &[u8], file_name: Option<&str>) -> FileMetadata {
    let digest = Sha256::digest(bytes);
    let sha256 = hex::encode(digest);
    let file_name = match file_name {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => format!("{}.bin", &sha256[..12]),
    };
    FileMetadata {
        file_name,
        file_size: bytes.len() as u64,
        sha256,
    }
}

/// Merge a decoded prediction with format metadata into the final record.
pub fn assemble(
    format: InputFormat,
    decoded: DecodedPrediction,
    file: Option<FileMetadata>,
    url: Option<UrlMetadata>,
) -> AnalysisVerdict {
    let message = message_for(format, &decoded);
    AnalysisVerdict {
        scan_id: uuid::Uuid::new_v4().to_string(),
        analyzed_at: Utc::now(),
        format,
        malicious: decoded.malicious,
        predicted_class: decoded.predicted_class,
        confidence: decoded.confidence,
        threat_probability: decoded.threat_probability,
        probabilities: decoded.probabilities,
        is_fallback: decoded.is_fallback,
        message,
        file,
        url,
    }
}

/// Fixed message rule: threat-class-specific when malicious, generic safe
/// message otherwise, explicit degraded message in the fallback case.
fn message_for(format: InputFormat, decoded: &DecodedPrediction) -> String {
    if decoded.is_fallback {
        return "Classifier not properly loaded; low-confidence fallback verdict".to_string();
    }
    if decoded.malicious {
        return match format {
            InputFormat::Executable => {
                format!("Malicious executable detected (class: {})", decoded.predicted_class)
            }
            InputFormat::Url => {
                format!("Dangerous URL detected (class: {})", decoded.predicted_class)
            }
        };
    }
    match format {
        InputFormat::Executable => "File appears safe".to_string(),
        InputFormat::Url => "URL appears safe".to_string(),
    }
}
