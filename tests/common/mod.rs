#![allow(dead_code)]

use async_trait::async_trait;
use candle_core::{Device, Tensor};
use secrecy::SecretString;
use sentiment_server::remote::{ChatCompletion, ChatCompletionError, ChatRequest};
use sentiment_server::{
    LocalAnalyzer, RemoteAnalyzer, RemoteConfig, SentimentAnalysisModel, SentimentRouter,
};
use std::sync::{Arc, Mutex};

/// Chat backend that answers every call with a fixed reply and records
/// what it was sent.
pub struct ScriptedChat {
    reply: Option<String>,
    pub calls: Mutex<Vec<(String, ChatRequest)>>,
}

impl ScriptedChat {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Every call fails as if the service returned 500.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatCompletion for ScriptedChat {
    async fn complete(
        &self,
        api_key: &str,
        request: &ChatRequest,
    ) -> Result<String, ChatCompletionError> {
        self.calls
            .lock()
            .unwrap()
            .push((api_key.to_string(), request.clone()));
        self.reply.clone().ok_or(ChatCompletionError::Api {
            status: 500,
            message: "internal error".to_string(),
        })
    }
}

/// Classifier that ignores its input and returns fixed logits.
pub struct FixedLogits {
    logits: [f32; 2],
    device: Device,
}

impl FixedLogits {
    pub fn new(negative: f32, positive: f32) -> Arc<Self> {
        Arc::new(Self {
            logits: [negative, positive],
            device: Device::Cpu,
        })
    }
}

impl SentimentAnalysisModel for FixedLogits {
    fn logits(&self, _text: &str) -> anyhow::Result<Tensor> {
        Ok(Tensor::new(&[self.logits], &self.device)?)
    }

    fn name(&self) -> &str {
        "fixed-logits"
    }
}

pub fn remote_analyzer(chat: Arc<ScriptedChat>, api_key: Option<&str>) -> RemoteAnalyzer {
    RemoteAnalyzer::new(
        chat,
        api_key.map(|k| SecretString::new(k.to_string())),
        RemoteConfig::default(),
    )
    .unwrap()
}

pub fn router(
    local: LocalAnalyzer,
    chat: Arc<ScriptedChat>,
    api_key: Option<&str>,
) -> SentimentRouter {
    SentimentRouter::new(local, remote_analyzer(chat, api_key))
}
