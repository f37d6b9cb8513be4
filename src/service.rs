//! Bounded async facade over the engine.
//!
//! Extraction and inference are CPU-bound; running them on the async I/O
//! threads would let one pathological input stall unrelated requests. The
//! service pushes each analysis onto the blocking pool behind a semaphore
//! so at most `workers` analyses run at once. Deadlines stay with the
//! caller (`tokio::time::timeout` around these calls).

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::engine::AnalysisEngine;
use crate::error::AnalysisError;
use crate::verdict::AnalysisVerdict;

pub struct AnalysisService {
    engine: Arc<AnalysisEngine>,
    permits: Arc<Semaphore>,
    workers: usize,
}

impl AnalysisService {
    /// Bound the worker pool at the machine's available parallelism,
    /// never fewer than two workers.
    pub fn new(engine: Arc<AnalysisEngine>) -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(2)
            .max(2);
        Self::with_workers(engine, workers)
    }

    pub fn with_workers(engine: Arc<AnalysisEngine>, workers: usize) -> Self {
        let workers = workers.max(1);
        log::info!("analysis service started with {} workers", workers);
        Self {
            engine,
            permits: Arc::new(Semaphore::new(workers)),
            workers,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn engine(&self) -> &Arc<AnalysisEngine> {
        &self.engine
    }

    pub async fn analyze_executable(
        &self,
        bytes: Vec<u8>,
        file_name: Option<String>,
    ) -> Result<AnalysisVerdict, AnalysisError> {
        let _permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| AnalysisError::ExtractionFailure("worker pool closed".into()))?;

        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || {
            engine.analyze_executable(&bytes, file_name.as_deref())
        })
        .await
        .map_err(|e| AnalysisError::ExtractionFailure(format!("analysis task failed: {}", e)))?
    }

    pub async fn analyze_url(&self, url: String) -> Result<AnalysisVerdict, AnalysisError> {
        let _permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| AnalysisError::ExtractionFailure("worker pool closed".into()))?;

        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || engine.analyze_url(&url))
            .await
            .map_err(|e| AnalysisError::ExtractionFailure(format!("analysis task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_url_analysis_through_service() {
        let service = AnalysisService::with_workers(Arc::new(AnalysisEngine::unavailable()), 2);
        let verdict = service
            .analyze_url("https://bit.ly/2Vxn3ad".to_string())
            .await
            .unwrap();
        assert!(verdict.is_fallback);
        assert!(!verdict.malicious);
    }

    #[tokio::test]
    async fn test_error_propagates_through_service() {
        let service = AnalysisService::with_workers(Arc::new(AnalysisEngine::unavailable()), 1);
        let err = service
            .analyze_executable(b"not a pe".to_vec(), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "unsupported_format");
    }

    #[tokio::test]
    async fn test_concurrent_requests_complete() {
        let service = Arc::new(AnalysisService::with_workers(
            Arc::new(AnalysisEngine::unavailable()),
            2,
        ));
        let mut handles = Vec::new();
        for i in 0..8 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.analyze_url(format!("http://example{}.com", i)).await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
    }
}
