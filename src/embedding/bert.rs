use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_core::IndexOp;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};
use std::path::Path;

/// BERT (or RoBERTa-prefixed) encoder with a single-logit relevance head.
struct RelevanceHead {
    encoder: BertModel,
    classifier: Linear,
}

impl RelevanceHead {
    fn load(vb: VarBuilder, config: &Config) -> Result<Self> {
        let prefix = ["bert", "roberta"]
            .into_iter()
            .find(|p| vb.contains_tensor(&format!("{p}.embeddings.word_embeddings.weight")));

        let encoder = match prefix {
            Some(p) => BertModel::load(vb.pp(p), config)?,
            None => BertModel::load(vb.clone(), config)?,
        };
        let classifier = candle_nn::linear(config.hidden_size, 1, vb.pp("classifier"))?;

        Ok(Self {
            encoder,
            classifier,
        })
    }

    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        let hidden = self
            .encoder
            .forward(input_ids, token_type_ids, Some(attention_mask))?;
        // [CLS] position of every row in the batch.
        let cls = hidden.i((.., 0, ..))?;
        self.classifier.forward(&cls)
    }
}

/// Cross-encoder loaded from `config.json` + `model.safetensors`.
#[derive(Clone)]
pub struct CrossEncoderModel(std::sync::Arc<RelevanceHead>);

impl CrossEncoderModel {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let config_content = std::fs::read_to_string(model_dir.join("config.json"))?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;

        let weights = [model_dir.join("model.safetensors")];
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&weights, DType::F32, device)? };

        Ok(Self(std::sync::Arc::new(RelevanceHead::load(vb, &config)?)))
    }

    /// Returns logits shaped `(batch, 1)`.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        self.0.forward(input_ids, token_type_ids, attention_mask)
    }
}
