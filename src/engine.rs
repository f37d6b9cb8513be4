//! AnalysisEngine - the core entry point.
//!
//! Holds the classifier state for both input formats, loaded exactly once
//! and injected into every request (no process-wide mutable singleton).
//! The engine is `Send + Sync`; each analysis call is stateless with
//! respect to other requests and safe to run concurrently.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::features;
use crate::model::loader::{self, ArtifactConfig, ModelState, EXECUTABLE_MODEL_STEM, URL_MODEL_STEM};
use crate::model::classify;
use crate::pe::{self, PeError};
use crate::verdict::{self, AnalysisVerdict, InputFormat, UrlMetadata};

/// Engine status snapshot for operators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub executable_model_loaded: bool,
    pub url_model_loaded: bool,
    pub executable_schema_hash: Option<u32>,
    pub url_schema_hash: Option<u32>,
    pub analysis_count: u64,
    pub avg_latency_ms: f32,
}

pub struct AnalysisEngine {
    executable_model: ModelState,
    url_model: ModelState,
    latency_sum_us: AtomicU64,
    analysis_count: AtomicU64,
}

impl AnalysisEngine {
    /// Load both classifier pairs through the probe path. Failures degrade
    /// to fallback verdicts; this constructor never errors.
    pub fn load(config: &ArtifactConfig) -> Self {
        log::info!(
            "loading classifier artifacts (probe path: {} dirs)",
            config.search_dirs.len()
        );
        Self::with_models(
            loader::load_model(config, EXECUTABLE_MODEL_STEM),
            loader::load_model(config, URL_MODEL_STEM),
        )
    }

    /// Engine with both models absent; every verdict is a fallback.
    pub fn unavailable() -> Self {
        Self::with_models(
            ModelState::Unavailable {
                reason: "loading skipped".into(),
            },
            ModelState::Unavailable {
                reason: "loading skipped".into(),
            },
        )
    }

    /// Dependency-injection seam: supply pre-built model states.
    pub fn with_models(executable_model: ModelState, url_model: ModelState) -> Self {
        Self {
            executable_model,
            url_model,
            latency_sum_us: AtomicU64::new(0),
            analysis_count: AtomicU64::new(0),
        }
    }

    pub fn status(&self) -> EngineStatus {
        let count = self.analysis_count.load(Ordering::Relaxed);
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let avg = if count > 0 {
            (sum as f32 / count as f32) / 1000.0
        } else {
            0.0
        };
        EngineStatus {
            executable_model_loaded: self.executable_model.is_loaded(),
            url_model_loaded: self.url_model.is_loaded(),
            executable_schema_hash: self.executable_model.schema_hash(),
            url_schema_hash: self.url_model.schema_hash(),
            analysis_count: count,
            avg_latency_ms: avg,
        }
    }

    /// Analyze an uploaded executable image.
    ///
    /// The caller guarantees the buffer is fully materialized and within
    /// its size ceiling. Returns `UnsupportedFormat` for non-PE input,
    /// `ExtractionFailure` when not even the header chain parses.
    pub fn analyze_executable(
        &self,
        bytes: &[u8],
        file_name: Option<&str>,
    ) -> Result<AnalysisVerdict, AnalysisError> {
        if bytes.is_empty() {
            return Err(AnalysisError::InvalidInput("empty file buffer".into()));
        }

        let started = Instant::now();
        let summary = pe::parse(bytes).map_err(|e| match e {
            PeError::NotExecutable => {
                AnalysisError::UnsupportedFormat("missing MZ signature".into())
            }
            PeError::Truncated(detail) => AnalysisError::ExtractionFailure(detail),
        })?;

        let features = features::executable::build(&summary);
        log::debug!(
            "executable features extracted: {} sections, {} dlls, {} features",
            summary.sections.len(),
            summary.imports.len(),
            features.len()
        );

        let decoded = classify(&self.executable_model, &features);
        let meta = verdict::file_metadata(bytes, file_name);
        self.track_latency(started);

        Ok(verdict::assemble(
            InputFormat::Executable,
            decoded,
            Some(meta),
            None,
        ))
    }

    /// Analyze a URL string. The caller guarantees a non-empty string;
    /// blank or control-character input is rejected before extraction.
    pub fn analyze_url(&self, url: &str) -> Result<AnalysisVerdict, AnalysisError> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(AnalysisError::InvalidInput("empty URL".into()));
        }
        if trimmed.chars().any(|c| c.is_control()) {
            return Err(AnalysisError::InvalidInput(
                "URL contains control characters".into(),
            ));
        }

        let started = Instant::now();
        let (normalized, features) = features::url::build(trimmed);
        log::debug!("url features extracted: {} features", features.len());

        let decoded = classify(&self.url_model, &features);
        self.track_latency(started);

        Ok(verdict::assemble(
            InputFormat::Url,
            decoded,
            None,
            Some(UrlMetadata {
                url: trimmed.to_string(),
                normalized_url: normalized,
            }),
        ))
    }

    fn track_latency(&self, started: Instant) {
        self.latency_sum_us
            .fetch_add(started.elapsed().as_micros() as u64, Ordering::Relaxed);
        self.analysis_count.fetch_add(1, Ordering::Relaxed);
    }
}
