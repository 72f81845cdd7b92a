//! Process configuration.
//!
//! Everything is read from command-line flags with environment fallbacks;
//! the binary loads a `.env` file first so local development can keep the
//! remote API key out of the shell history.

use crate::pipelines::utils::DeviceRequest;
use clap::Parser;
use secrecy::SecretString;
use std::time::Duration;

pub const DEFAULT_MODEL_REPO: &str = "artisokka/imdb-fine-tuned-distilbert";
pub const DEFAULT_REMOTE_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_REMOTE_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

#[derive(Debug, Clone, Parser)]
#[command(
    name = "sentiment_server",
    version,
    about = "Sentiment analysis over a local classifier or a remote LLM"
)]
pub struct ServerConfig {
    /// Address to bind.
    #[arg(long, env = "SENTIMENT_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "SENTIMENT_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Hugging Face repository of the sequence classification model.
    #[arg(long, env = "SENTIMENT_MODEL_REPO", default_value = DEFAULT_MODEL_REPO)]
    pub model_repo: String,

    #[arg(long, env = "SENTIMENT_MODEL_REVISION", default_value = "main")]
    pub revision: String,

    /// Run the local classifier on CPU even if CUDA is available.
    #[arg(long, env = "SENTIMENT_FORCE_CPU", conflicts_with = "cuda_device")]
    pub cpu: bool,

    /// CUDA device index for the local classifier. If the device cannot be
    /// opened the classifier stays unloaded and `custom` returns neutral.
    #[arg(long, env = "SENTIMENT_CUDA_DEVICE")]
    pub cuda_device: Option<usize>,

    /// Start without loading the local classifier; `custom` requests
    /// then return the neutral fallback.
    #[arg(long)]
    pub skip_local_model: bool,

    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub groq_api_key: Option<String>,

    #[arg(long, env = "GROQ_API_URL", default_value = DEFAULT_REMOTE_URL)]
    pub remote_url: String,

    #[arg(long, env = "GROQ_MODEL", default_value = DEFAULT_REMOTE_MODEL)]
    pub remote_model: String,

    /// Upper bound on a single remote completion call.
    #[arg(long, env = "GROQ_TIMEOUT_SECS", default_value_t = 30)]
    pub remote_timeout_secs: u64,

    /// Origins allowed by CORS. Repeat the flag or pass a comma separated list.
    #[arg(
        long = "cors-origin",
        env = "SENTIMENT_CORS_ORIGINS",
        value_delimiter = ',',
        default_value = DEFAULT_CORS_ORIGINS
    )]
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// The remote API key, treating an empty value as unset.
    pub fn credential(&self) -> Option<SecretString> {
        self.groq_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| SecretString::new(key.to_string()))
    }

    /// Device for the local classifier: an explicit CUDA index, forced CPU,
    /// or CUDA 0 when available.
    pub fn device_request(&self) -> DeviceRequest {
        match (self.cuda_device, self.cpu) {
            (Some(index), _) => DeviceRequest::Cuda(index),
            (None, true) => DeviceRequest::Cpu,
            (None, false) => DeviceRequest::Default,
        }
    }

    pub fn remote_config(&self) -> RemoteConfig {
        RemoteConfig {
            url: self.remote_url.clone(),
            model: self.remote_model.clone(),
            timeout: Duration::from_secs(self.remote_timeout_secs),
            ..RemoteConfig::default()
        }
    }
}

/// Endpoint and sampling settings for the remote chat-completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteConfig {
    pub url: String,
    pub model: String,
    pub timeout: Duration,
    pub temperature: f32,
    pub top_p: f32,
    pub max_completion_tokens: u32,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REMOTE_URL.to_string(),
            model: DEFAULT_REMOTE_MODEL.to_string(),
            timeout: Duration::from_secs(30),
            temperature: 1.0,
            top_p: 1.0,
            max_completion_tokens: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn explicit_flags_override_defaults() {
        let config = ServerConfig::try_parse_from([
            "sentiment_server",
            "--port",
            "9000",
            "--groq-api-key",
            "  gsk_test  ",
            "--cors-origin",
            "http://a.test,http://b.test",
            "--remote-timeout-secs",
            "5",
        ])
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(
            config.credential().map(|k| k.expose_secret().clone()),
            Some("gsk_test".to_string())
        );

        let remote = config.remote_config();
        assert_eq!(remote.timeout, Duration::from_secs(5));
        assert_eq!(remote.max_completion_tokens, 20);
        assert_eq!(remote.temperature, 1.0);
        assert_eq!(remote.top_p, 1.0);
    }

    #[test]
    fn device_flags_select_the_device() {
        let default = ServerConfig::try_parse_from(["sentiment_server"]).unwrap();
        assert_eq!(default.device_request(), DeviceRequest::Default);

        let cpu = ServerConfig::try_parse_from(["sentiment_server", "--cpu"]).unwrap();
        assert_eq!(cpu.device_request(), DeviceRequest::Cpu);

        let cuda =
            ServerConfig::try_parse_from(["sentiment_server", "--cuda-device", "1"]).unwrap();
        assert_eq!(cuda.device_request(), DeviceRequest::Cuda(1));

        assert!(ServerConfig::try_parse_from([
            "sentiment_server",
            "--cpu",
            "--cuda-device",
            "0"
        ])
        .is_err());
    }

    #[test]
    fn blank_api_key_is_treated_as_missing() {
        let config =
            ServerConfig::try_parse_from(["sentiment_server", "--groq-api-key", "   "]).unwrap();
        assert!(config.credential().is_none());
    }
}
