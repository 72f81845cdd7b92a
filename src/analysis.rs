//! Request and result types shared by every sentiment backend.
//!
//! Both analyzers return an [`AnalysisResult`]; callers cannot tell which
//! backend produced it. Confidence is clamped on construction so the
//! `[0, 1]` range holds no matter what a backend reports.

use crate::core::AnalysisError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Confidence reported alongside [`Sentiment::Neutral`] when a backend
/// cannot produce a genuine answer.
pub const NEUTRAL_CONFIDENCE: f32 = 0.5;

/// Three-way sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which analyzer handles a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Fine-tuned classifier loaded in process. Wire name `custom`.
    Local,
    /// Remote chat-completion LLM. Wire name `llama`.
    Remote,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Local => "custom",
            Backend::Remote => "llama",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Backend {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "custom" => Ok(Backend::Local),
            "llama" => Ok(Backend::Remote),
            other => Err(AnalysisError::InvalidArgument(other.to_string())),
        }
    }
}

/// A single classification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub text: String,
    pub backend: Backend,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>, backend: Backend) -> Self {
        Self {
            text: text.into(),
            backend,
        }
    }
}

/// Normalized output of either backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub sentiment: Sentiment,
    #[serde(rename = "confidence_score")]
    pub confidence: f32,
}

impl AnalysisResult {
    /// Build a result, clamping `confidence` into `[0, 1]`.
    ///
    /// A NaN confidence carries no information and is replaced with
    /// [`NEUTRAL_CONFIDENCE`].
    pub fn new(sentiment: Sentiment, confidence: f32) -> Self {
        let confidence = if confidence.is_nan() {
            NEUTRAL_CONFIDENCE
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            sentiment,
            confidence,
        }
    }

    /// The `{neutral, 0.5}` result returned whenever a backend is unavailable.
    pub fn neutral() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            confidence: NEUTRAL_CONFIDENCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(AnalysisResult::new(Sentiment::Negative, 1.5).confidence, 1.0);
        assert_eq!(AnalysisResult::new(Sentiment::Positive, -0.2).confidence, 0.0);
        assert_eq!(AnalysisResult::new(Sentiment::Positive, 0.75).confidence, 0.75);
    }

    #[test]
    fn nan_confidence_becomes_neutral_confidence() {
        let result = AnalysisResult::new(Sentiment::Positive, f32::NAN);
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert_eq!(result.confidence, NEUTRAL_CONFIDENCE);
    }

    #[test]
    fn backend_wire_names() {
        assert_eq!("custom".parse::<Backend>().unwrap(), Backend::Local);
        assert_eq!("llama".parse::<Backend>().unwrap(), Backend::Remote);
        assert!(matches!(
            "gpt".parse::<Backend>(),
            Err(AnalysisError::InvalidArgument(model)) if model == "gpt"
        ));
        // selectors are case sensitive
        assert!("Custom".parse::<Backend>().is_err());
    }

    #[test]
    fn result_serializes_with_confidence_score_field() {
        let json = serde_json::to_value(AnalysisResult::new(Sentiment::Negative, 0.25)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "sentiment": "negative", "confidence_score": 0.25 })
        );
    }
}
