//! Outward-facing error taxonomy for analysis requests.
//!
//! Every variant carries a stable machine-readable kind plus a human
//! message. A missing or corrupt classifier is NOT an error: the engine
//! answers those requests with an explicitly flagged fallback verdict.

use serde_json::json;

/// Error returned to the caller of an analysis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Input lacks the required signature (e.g. no `MZ` marker).
    /// A rejection, not an internal failure.
    UnsupportedFormat(String),
    /// Structural parse could not produce any usable features.
    ExtractionFailure(String),
    /// Empty or malformed input; no extraction was attempted.
    InvalidInput(String),
}

impl AnalysisError {
    /// Stable machine-readable kind string.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::UnsupportedFormat(_) => "unsupported_format",
            AnalysisError::ExtractionFailure(_) => "extraction_failure",
            AnalysisError::InvalidInput(_) => "invalid_input",
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            AnalysisError::UnsupportedFormat(d)
            | AnalysisError::ExtractionFailure(d)
            | AnalysisError::InvalidInput(d) => d,
        }
    }

    /// JSON shape handed to the route layer: `{kind, message}`.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "kind": self.kind(),
            "message": self.to_string(),
        })
    }
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::UnsupportedFormat(d) => write!(f, "unsupported format: {}", d),
            AnalysisError::ExtractionFailure(d) => write!(f, "feature extraction failed: {}", d),
            AnalysisError::InvalidInput(d) => write!(f, "invalid input: {}", d),
        }
    }
}

impl std::error::Error for AnalysisError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_stable() {
        assert_eq!(AnalysisError::UnsupportedFormat("x".into()).kind(), "unsupported_format");
        assert_eq!(AnalysisError::ExtractionFailure("x".into()).kind(), "extraction_failure");
        assert_eq!(AnalysisError::InvalidInput("x".into()).kind(), "invalid_input");
    }

    #[test]
    fn test_json_shape() {
        let err = AnalysisError::UnsupportedFormat("missing MZ signature".into());
        let value = err.to_json();
        assert_eq!(value["kind"], "unsupported_format");
        assert!(value["message"].as_str().is_some_and(|m| m.contains("MZ")));
    }
}
