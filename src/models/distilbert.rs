//! DistilBERT sequence classifier.
//!
//! The encoder comes from `candle-transformers`; the classification head
//! mirrors Hugging Face's `DistilBertForSequenceClassification`:
//! `[CLS] -> pre_classifier -> ReLU -> classifier`.

use crate::pipelines::sentiment::model::SentimentAnalysisModel;
use anyhow::{Error as E, Result as AnyhowResult};
use candle_core::{DType, Device, IndexOp, Module, Tensor};
use candle_nn::{linear, Linear, VarBuilder};
use candle_transformers::models::distilbert::{Config, DistilBertModel};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tokenizers::{Tokenizer, TruncationParams};

const DEFAULT_DIM: usize = 768;
const DEFAULT_MAX_POSITIONS: usize = 512;

/// Fields of `config.json` that the encoder config does not expose.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub id2label: HashMap<String, String>,
    #[serde(default)]
    pub dim: Option<usize>,
    #[serde(default)]
    pub max_position_embeddings: Option<usize>,
}

impl ClassifierConfig {
    pub fn hidden_size(&self) -> usize {
        self.dim.unwrap_or(DEFAULT_DIM)
    }

    /// Two labels unless `id2label` says otherwise.
    pub fn num_labels(&self) -> usize {
        if self.id2label.is_empty() {
            2
        } else {
            self.id2label.len()
        }
    }

    pub fn max_length(&self) -> usize {
        self.max_position_embeddings.unwrap_or(DEFAULT_MAX_POSITIONS)
    }
}

pub struct DistilBertSentimentModel {
    name: String,
    model: DistilBertModel,
    pre_classifier: Option<Linear>,
    classifier: Linear,
    tokenizer: Tokenizer,
    device: Device,
    id2label: HashMap<String, String>,
}

impl DistilBertSentimentModel {
    /// Build the classifier from files already present on disk.
    pub fn load(
        name: &str,
        config: &Config,
        classifier_config: &ClassifierConfig,
        weights_filename: &Path,
        mut tokenizer: Tokenizer,
        device: Device,
    ) -> AnyhowResult<Self> {
        let dtype = DType::F32;
        let vb = if weights_filename
            .extension()
            .is_some_and(|ext| ext == "safetensors")
        {
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_filename], dtype, &device)? }
        } else if weights_filename
            .extension()
            .is_some_and(|ext| ext == "bin")
        {
            VarBuilder::from_pth(weights_filename, dtype, &device)?
        } else {
            anyhow::bail!("Unsupported weight file format: {:?}", weights_filename);
        };

        let model = DistilBertModel::load(vb.pp("distilbert"), config)?;

        let (pre_classifier, classifier) = load_head(
            &vb,
            classifier_config.hidden_size(),
            classifier_config.num_labels(),
        )?;
        if pre_classifier.is_none() {
            tracing::debug!(model = name, "no pre_classifier weights, using [CLS] directly");
        }

        // Long reviews are cut to the position embedding table; padding is
        // never needed for a single sequence.
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: classifier_config.max_length(),
                ..Default::default()
            }))
            .map_err(E::msg)?;
        tokenizer.with_padding(None);

        Ok(Self {
            name: name.to_string(),
            model,
            pre_classifier,
            classifier,
            tokenizer,
            device,
            id2label: classifier_config.id2label.clone(),
        })
    }

    pub fn id2label(&self) -> &HashMap<String, String> {
        &self.id2label
    }
}

/// Loads the classification head. `pre_classifier` is optional, but when its
/// weight is present any load error (such as a shape mismatch) is returned.
fn load_head(
    vb: &VarBuilder,
    hidden_size: usize,
    num_labels: usize,
) -> candle_core::Result<(Option<Linear>, Linear)> {
    let pre_classifier = if vb.contains_tensor("pre_classifier.weight") {
        Some(linear(hidden_size, hidden_size, vb.pp("pre_classifier"))?)
    } else {
        None
    };
    let classifier = linear(hidden_size, num_labels, vb.pp("classifier"))?;
    Ok((pre_classifier, classifier))
}

impl SentimentAnalysisModel for DistilBertSentimentModel {
    fn logits(&self, text: &str) -> AnyhowResult<Tensor> {
        let tokens = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| E::msg(format!("Tokenization error: {e}")))?;

        let input_ids = Tensor::new(tokens.get_ids(), &self.device)?.unsqueeze(0)?;

        // candle's DistilBERT masks positions where the mask is non-zero, the
        // inverse of the tokenizer's convention.
        let inverted_mask: Vec<u8> = tokens
            .get_attention_mask()
            .iter()
            .map(|&m| u8::from(m == 0))
            .collect();
        let attention_mask = Tensor::new(inverted_mask.as_slice(), &self.device)?.unsqueeze(0)?;

        // (1, seq_len, dim)
        let hidden_states = self.model.forward(&input_ids, &attention_mask)?;

        // (1, dim)
        let cls = hidden_states.i((.., 0))?;
        let pooled = match &self.pre_classifier {
            Some(pre_classifier) => pre_classifier.forward(&cls)?.relu()?,
            None => cls,
        };

        // (1, num_labels)
        Ok(self.classifier.forward(&pooled)?)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
