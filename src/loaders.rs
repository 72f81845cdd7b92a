//! Hugging Face Hub loaders for the local classifier.
//!
//! - [`HfLoader`] - fetches a single file from a model repository, retrying
//!   when the hub cache lock is contended
//! - [`TokenizerLoader`] - loads `tokenizer.json`
//! - [`WeightsLoader`] - locates the model weights, preferring safetensors
//! - [`JsonConfigLoader`] - reads and deserializes `config.json`
//!
//! All loaders resolve against a pinned repository revision.

use hf_hub::{Repo, RepoType};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use tokenizers::Tokenizer;

#[derive(Debug, Clone)]
pub struct HfLoader {
    pub repo: String,
    pub revision: String,
    pub filename: String,
}

impl HfLoader {
    pub fn new(repo: &str, revision: &str, filename: &str) -> Self {
        Self {
            repo: repo.into(),
            revision: revision.into(),
            filename: filename.into(),
        }
    }

    pub async fn load(&self) -> anyhow::Result<PathBuf> {
        let hf_api = hf_hub::api::tokio::ApiBuilder::new()
            .with_chunk_size(None)
            .build()?;
        let hf_repo = hf_api.repo(Repo::with_revision(
            self.repo.clone(),
            RepoType::Model,
            self.revision.clone(),
        ));

        let max_retries = 3;
        let mut attempt = 0;

        loop {
            match hf_repo.get(self.filename.as_str()).await {
                Ok(path) => return Ok(path),
                Err(e) => {
                    let error_msg = e.to_string();
                    if error_msg.contains("Lock acquisition failed") && attempt < max_retries - 1 {
                        let wait_time = std::time::Duration::from_millis(100 * (1 << attempt));
                        tracing::debug!(
                            repo = %self.repo,
                            file = %self.filename,
                            attempt,
                            "hub lock busy, retrying"
                        );
                        tokio::time::sleep(wait_time).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(anyhow::anyhow!(
                        "failed to fetch {} from {}@{}: {e}",
                        self.filename,
                        self.repo,
                        self.revision
                    ));
                }
            }
        }
    }
}

#[derive(Clone)]
pub struct TokenizerLoader {
    pub tokenizer_file_loader: HfLoader,
}

impl TokenizerLoader {
    pub fn new(repo: &str, revision: &str) -> Self {
        Self {
            tokenizer_file_loader: HfLoader::new(repo, revision, "tokenizer.json"),
        }
    }

    pub async fn load(&self) -> anyhow::Result<Tokenizer> {
        let tokenizer_file_path = self.tokenizer_file_loader.load().await?;

        let tokenizer =
            Tokenizer::from_file(tokenizer_file_path).map_err(anyhow::Error::msg)?;

        Ok(tokenizer)
    }
}

/// Deserializes a JSON file such as `config.json`, returning both the typed
/// value and the raw JSON for fields the typed view does not expose.
pub struct JsonConfigLoader {
    pub config_file_loader: HfLoader,
}

impl JsonConfigLoader {
    pub fn new(repo: &str, revision: &str, filename: &str) -> Self {
        Self {
            config_file_loader: HfLoader::new(repo, revision, filename),
        }
    }

    pub async fn load<T: DeserializeOwned>(&self) -> anyhow::Result<(T, serde_json::Value)> {
        let path = self.config_file_loader.load().await?;
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {path:?}: {e}"))?;

        let typed: T = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse model config: {e}"))?;
        let raw: serde_json::Value = serde_json::from_str(&content)?;

        Ok((typed, raw))
    }
}

#[derive(Clone)]
pub struct WeightsLoader {
    repo: String,
    revision: String,
}

impl WeightsLoader {
    pub fn new(repo: &str, revision: &str) -> Self {
        Self {
            repo: repo.into(),
            revision: revision.into(),
        }
    }

    /// Path to `model.safetensors`, or `pytorch_model.bin` when the repo only
    /// ships PyTorch weights.
    pub async fn load(&self) -> anyhow::Result<PathBuf> {
        match HfLoader::new(&self.repo, &self.revision, "model.safetensors")
            .load()
            .await
        {
            Ok(safetensors) => Ok(safetensors),
            Err(_) => match HfLoader::new(&self.repo, &self.revision, "pytorch_model.bin")
                .load()
                .await
            {
                Ok(pytorch_model) => Ok(pytorch_model),
                Err(e) => anyhow::bail!(
                    "Model weights not found in repo {}. Expected `model.safetensors` \
                     or `pytorch_model.bin`. Error: {e}",
                    self.repo
                ),
            },
        }
    }
}
