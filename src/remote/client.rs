//! OpenAI-compatible chat-completion client.

use crate::core::{Message, RemoteConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatCompletionError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Missing content in response")]
    MissingContent,
}

/// Body of a `POST /chat/completions` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub top_p: f32,
    pub max_completion_tokens: u32,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

impl ChatRequest {
    pub fn new(config: &RemoteConfig, messages: Vec<Message>) -> Self {
        Self {
            model: config.model.clone(),
            messages,
            temperature: config.temperature,
            top_p: config.top_p,
            max_completion_tokens: config.max_completion_tokens,
            stream: false,
            stop: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessageResponse>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

/// A service that answers a chat-completion request with free text.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(
        &self,
        api_key: &str,
        request: &ChatRequest,
    ) -> Result<String, ChatCompletionError>;
}

/// reqwest client for Groq (or any OpenAI-compatible endpoint).
pub struct GroqClient {
    client: Client,
    url: String,
}

impl GroqClient {
    pub fn new(config: &RemoteConfig) -> Result<Self, ChatCompletionError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl ChatCompletion for GroqClient {
    async fn complete(
        &self,
        api_key: &str,
        request: &ChatRequest,
    ) -> Result<String, ChatCompletionError> {
        let started = Instant::now();
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ChatCompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response.json().await?;
        tracing::debug!(
            model = %request.model,
            latency_ms = started.elapsed().as_millis() as u64,
            "chat completion received"
        );

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or(ChatCompletionError::MissingContent)
    }
}
