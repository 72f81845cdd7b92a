use super::client::{ChatCompletion, ChatRequest};
use super::parser::parse_completion;
use super::prompt::PromptTemplate;
use crate::analysis::AnalysisResult;
use crate::core::{AnalysisError, Message, RemoteConfig};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, warn};

/// Delegates classification to a remote chat-completion model.
///
/// A missing API key is a deployment error and is returned to the caller.
/// Every other failure (transport, status, body) is logged and answered
/// with the neutral fallback; there are no retries.
pub struct RemoteAnalyzer {
    client: Arc<dyn ChatCompletion>,
    credential: Option<SecretString>,
    config: RemoteConfig,
    prompt: PromptTemplate,
}

impl RemoteAnalyzer {
    pub fn new(
        client: Arc<dyn ChatCompletion>,
        credential: Option<SecretString>,
        config: RemoteConfig,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            client,
            credential,
            config,
            prompt: PromptTemplate::new()?,
        })
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalysisError> {
        let api_key = self
            .credential
            .as_ref()
            .ok_or(AnalysisError::MissingCredential)?;

        let prompt = match self.prompt.render(text) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!(error = %e, "failed to render prompt, returning neutral fallback");
                return Ok(AnalysisResult::neutral());
            }
        };

        let request = ChatRequest::new(&self.config, vec![Message::user(&prompt)]);
        match self.client.complete(api_key.expose_secret(), &request).await {
            Ok(content) => {
                debug!(response = %content, "remote completion");
                Ok(parse_completion(&content))
            }
            Err(e) => {
                warn!(
                    model = %self.config.model,
                    error = %e,
                    "remote completion failed, returning neutral fallback"
                );
                Ok(AnalysisResult::neutral())
            }
        }
    }
}
