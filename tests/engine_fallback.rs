//! End-to-end behavior when no classifier artifact can be loaded: every
//! analysis call still answers, with an explicitly flagged benign-leaning
//! fallback verdict, and format rejections keep working.

use std::sync::Arc;

use threat_detector_core::model::loader::{self, ArtifactConfig, EXECUTABLE_MODEL_STEM, URL_MODEL_STEM};
use threat_detector_core::{AnalysisEngine, AnalysisService, InputFormat};

/// Valid minimal PE32 header chain with zero sections.
fn minimal_pe() -> Vec<u8> {
    let mut d = vec![0u8; 0x400];
    d[0] = b'M';
    d[1] = b'Z';
    d[0x3C..0x40].copy_from_slice(&0x80u32.to_le_bytes());
    d[0x80..0x84].copy_from_slice(b"PE\0\0");
    d[0x84..0x86].copy_from_slice(&0x014Cu16.to_le_bytes());
    d[0x94..0x96].copy_from_slice(&224u16.to_le_bytes());
    d[0x98..0x9A].copy_from_slice(&0x10Bu16.to_le_bytes());
    d
}

fn engine_from_empty_dir() -> AnalysisEngine {
    let dir = tempfile::tempdir().unwrap();
    let config = ArtifactConfig::single_dir(dir.path());
    AnalysisEngine::with_models(
        loader::load_model(&config, EXECUTABLE_MODEL_STEM),
        loader::load_model(&config, URL_MODEL_STEM),
    )
}

#[test]
fn unloaded_models_yield_fallback_verdicts() {
    let engine = engine_from_empty_dir();

    let file_verdict = engine.analyze_executable(&minimal_pe(), Some("setup.exe")).unwrap();
    assert!(file_verdict.is_fallback);
    assert!(!file_verdict.malicious);
    assert_eq!(file_verdict.format, InputFormat::Executable);
    let sum: f64 = file_verdict.probabilities.values().sum();
    assert!((sum - 1.0).abs() < 1e-6);

    let url_verdict = engine.analyze_url("http://192.168.0.1/login").unwrap();
    assert!(url_verdict.is_fallback);
    assert!(!url_verdict.malicious);
    assert_eq!(url_verdict.format, InputFormat::Url);
}

#[test]
fn fallback_verdict_serializes_with_plain_numbers() {
    let engine = engine_from_empty_dir();
    let verdict = engine.analyze_executable(&minimal_pe(), None).unwrap();

    let json = serde_json::to_value(&verdict).unwrap();
    assert_eq!(json["is_fallback"], true);
    assert_eq!(json["malicious"], false);
    assert!(json["confidence"].is_f64());
    assert!(json["probabilities"].is_object());
    assert!(json["file"]["sha256"].is_string());
    assert_eq!(json["file"]["file_size"], 0x400);
}

#[test]
fn format_rejection_still_applies_without_models() {
    let engine = engine_from_empty_dir();

    let err = engine.analyze_executable(b"\x7fELF\x02\x01\x01", None).unwrap_err();
    assert_eq!(err.kind(), "unsupported_format");

    let err = engine.analyze_url("").unwrap_err();
    assert_eq!(err.kind(), "invalid_input");
}

#[tokio::test]
async fn service_serves_fallback_verdicts_concurrently() {
    let service = AnalysisService::with_workers(Arc::new(engine_from_empty_dir()), 2);

    let url_verdict = service
        .analyze_url("https://bit.ly/2Vxn3ad".to_string())
        .await
        .unwrap();
    assert!(url_verdict.is_fallback);

    let file_verdict = service
        .analyze_executable(minimal_pe(), Some("setup.exe".to_string()))
        .await
        .unwrap();
    assert!(file_verdict.is_fallback);
    assert_eq!(file_verdict.file.unwrap().file_name, "setup.exe");
}
