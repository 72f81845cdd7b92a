use crate::analysis::{AnalysisResult, Sentiment, NEUTRAL_CONFIDENCE};
use once_cell::sync::Lazy;
use regex::Regex;

// ASCII digits only: `f32::from_str` rejects other decimal digits.
static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+(\.[0-9]+)?").expect("valid regex"));

/// Interprets a free-text completion.
///
/// The label is a substring scan ("positive" wins over "negative", otherwise
/// neutral). The confidence is the first number in the text, clamped to
/// `[0, 1]`, or 0.5 when there is none. The two scans are independent.
pub fn parse_completion(content: &str) -> AnalysisResult {
    let content = content.to_lowercase();

    let sentiment = if content.contains("positive") {
        Sentiment::Positive
    } else if content.contains("negative") {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    };

    let confidence = NUMBER
        .find(&content)
        .and_then(|m| m.as_str().parse::<f32>().ok())
        .unwrap_or(NEUTRAL_CONFIDENCE);

    AnalysisResult::new(sentiment, confidence)
}
