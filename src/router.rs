use crate::analysis::{AnalysisRequest, AnalysisResult, Backend};
use crate::core::AnalysisError;
use crate::pipelines::sentiment::LocalAnalyzer;
use crate::remote::RemoteAnalyzer;
use std::time::Instant;
use tracing::info;

/// Dispatches each request to the analyzer its backend names.
///
/// Holds no per-request state; the analyzers are immutable after startup,
/// so one router is shared by every connection.
pub struct SentimentRouter {
    local: LocalAnalyzer,
    remote: RemoteAnalyzer,
}

impl SentimentRouter {
    pub fn new(local: LocalAnalyzer, remote: RemoteAnalyzer) -> Self {
        Self { local, remote }
    }

    pub fn local(&self) -> &LocalAnalyzer {
        &self.local
    }

    pub fn remote(&self) -> &RemoteAnalyzer {
        &self.remote
    }

    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let started = Instant::now();
        let result = match request.backend {
            Backend::Local => self.local.analyze(&request.text).await,
            Backend::Remote => self.remote.analyze(&request.text).await?,
        };

        info!(
            backend = %request.backend,
            text_len = request.text.len(),
            sentiment = %result.sentiment,
            confidence = result.confidence,
            latency_ms = started.elapsed().as_millis() as u64,
            "sentiment analyzed"
        );

        Ok(result)
    }

    /// Parse the wire-level model selector and dispatch.
    pub async fn analyze_raw(
        &self,
        text: String,
        model: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let backend: Backend = model.parse()?;
        self.analyze(AnalysisRequest::new(text, backend)).await
    }
}
