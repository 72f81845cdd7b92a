use super::model::SentimentAnalysisModel;
use crate::analysis::{AnalysisResult, Sentiment};
use candle_core::{DType, IndexOp, Tensor, D};
use candle_nn::ops::softmax;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Immutable handle to the classifier loaded at startup.
pub type LocalModelHandle = Arc<dyn SentimentAnalysisModel>;

const POSITIVE_CLASS: usize = 1;
const NUM_CLASSES: usize = 2;

/// Softmax over the class logits followed by argmax.
///
/// Returns the predicted class index and its probability.
pub fn classify_logits(logits: &Tensor) -> candle_core::Result<(usize, f32)> {
    let logits = logits.flatten_all()?.to_dtype(DType::F32)?;
    let probs = softmax(&logits, D::Minus1)?;
    let predicted = probs.argmax(D::Minus1)?.to_scalar::<u32>()? as usize;
    let confidence = probs.i(predicted)?.to_scalar::<f32>()?;
    Ok((predicted, confidence))
}

/// Runs the local classifier and maps its prediction onto [`AnalysisResult`].
///
/// When the model failed to load the analyzer has no handle and answers every
/// request with the neutral fallback. Inference errors are logged and take
/// the same path.
#[derive(Clone, Default)]
pub struct LocalAnalyzer {
    handle: Option<LocalModelHandle>,
}

impl LocalAnalyzer {
    pub fn new(handle: Option<LocalModelHandle>) -> Self {
        Self { handle }
    }

    /// An analyzer without a model.
    pub fn unavailable() -> Self {
        Self { handle: None }
    }

    pub fn is_loaded(&self) -> bool {
        self.handle.is_some()
    }

    pub async fn analyze(&self, text: &str) -> AnalysisResult {
        let Some(handle) = self.handle.clone() else {
            debug!("local classifier not loaded, returning neutral fallback");
            return AnalysisResult::neutral();
        };

        let text = text.to_owned();
        match tokio::task::spawn_blocking(move || predict(handle.as_ref(), &text)).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                warn!(error = %e, "local inference failed, returning neutral fallback");
                AnalysisResult::neutral()
            }
            Err(e) => {
                error!(error = %e, "local inference task aborted, returning neutral fallback");
                AnalysisResult::neutral()
            }
        }
    }
}

/// Synchronous inference on an already loaded model.
pub fn predict(model: &dyn SentimentAnalysisModel, text: &str) -> anyhow::Result<AnalysisResult> {
    let logits = model.logits(text)?;
    anyhow::ensure!(
        logits.elem_count() == NUM_CLASSES,
        "{} produced {} logits, expected {NUM_CLASSES}",
        model.name(),
        logits.elem_count()
    );

    let (class, confidence) = classify_logits(&logits)?;
    let sentiment = if class == POSITIVE_CLASS {
        Sentiment::Positive
    } else {
        Sentiment::Negative
    };

    Ok(AnalysisResult::new(sentiment, confidence))
}
