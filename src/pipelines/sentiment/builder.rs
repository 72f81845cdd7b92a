use super::pipeline::{LocalAnalyzer, LocalModelHandle};
use crate::core::config::DEFAULT_MODEL_REPO;
use crate::loaders::{JsonConfigLoader, TokenizerLoader, WeightsLoader};
use crate::models::{ClassifierConfig, DistilBertSentimentModel};
use crate::pipelines::utils::{DeviceRequest, DeviceSelectable};
use candle_transformers::models::distilbert::Config;
use std::sync::Arc;
use std::time::Instant;

/// Downloads and loads the local DistilBERT classifier.
///
/// ```rust,no_run
/// use sentiment_server::pipelines::sentiment::*;
/// use sentiment_server::pipelines::utils::DeviceSelectable;
///
/// # async fn run() -> anyhow::Result<()> {
/// let model = SentimentAnalysisPipelineBuilder::distilbert("artisokka/imdb-fine-tuned-distilbert")
///     .cpu()
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct SentimentAnalysisPipelineBuilder {
    repo: String,
    revision: String,
    device_request: DeviceRequest,
}

impl SentimentAnalysisPipelineBuilder {
    pub fn distilbert(repo: &str) -> Self {
        Self {
            repo: repo.to_string(),
            revision: "main".to_string(),
            device_request: DeviceRequest::Default,
        }
    }

    pub fn revision(mut self, revision: &str) -> Self {
        self.revision = revision.to_string();
        self
    }

    pub async fn build(self) -> anyhow::Result<DistilBertSentimentModel> {
        let device = self.device_request.resolve()?;
        let started = Instant::now();

        let (config, raw): (Config, serde_json::Value) =
            JsonConfigLoader::new(&self.repo, &self.revision, "config.json")
                .load()
                .await?;
        let classifier_config: ClassifierConfig = serde_json::from_value(raw)?;
        let tokenizer = TokenizerLoader::new(&self.repo, &self.revision).load().await?;
        let weights_filename = WeightsLoader::new(&self.repo, &self.revision).load().await?;

        let model = DistilBertSentimentModel::load(
            &self.repo,
            &config,
            &classifier_config,
            &weights_filename,
            tokenizer,
            device,
        )?;

        tracing::info!(
            repo = %self.repo,
            revision = %self.revision,
            labels = ?model.id2label(),
            load_ms = started.elapsed().as_millis() as u64,
            "local classifier loaded"
        );

        Ok(model)
    }

    /// Build the analyzer, degrading to a model-less one when loading fails.
    pub async fn build_analyzer(self) -> LocalAnalyzer {
        let repo = self.repo.clone();
        match self.build().await {
            Ok(model) => {
                let handle: LocalModelHandle = Arc::new(model);
                LocalAnalyzer::new(Some(handle))
            }
            Err(e) => {
                tracing::error!(
                    repo = %repo,
                    error = %e,
                    "failed to load local classifier, custom requests will return neutral"
                );
                LocalAnalyzer::unavailable()
            }
        }
    }
}

impl Default for SentimentAnalysisPipelineBuilder {
    fn default() -> Self {
        Self::distilbert(DEFAULT_MODEL_REPO)
    }
}

impl DeviceSelectable for SentimentAnalysisPipelineBuilder {
    fn device_request_mut(&mut self) -> &mut DeviceRequest {
        &mut self.device_request
    }
}
