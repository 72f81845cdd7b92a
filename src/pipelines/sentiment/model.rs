use candle_core::Tensor;

/// A loaded sequence classifier, bundled with the tokenizer it was trained with.
///
/// Implementations return raw logits of shape `(1, num_labels)`; turning them
/// into a sentiment is the analyzer's job. Label index 0 is negative and
/// index 1 is positive.
pub trait SentimentAnalysisModel: Send + Sync {
    fn logits(&self, text: &str) -> anyhow::Result<Tensor>;

    /// Human readable identifier used in logs.
    fn name(&self) -> &str;
}
