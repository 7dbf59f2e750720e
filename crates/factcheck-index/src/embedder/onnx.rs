//! Sentence-transformer embeddings through ONNX Runtime.

use std::path::{Path, PathBuf};

use ndarray::{Array2, ArrayView1, ArrayView2};
use ort::{GraphOptimizationLevel, Session};
use tokenizers::Tokenizer;
use tracing::{debug, info};

use super::Embedder;
use crate::error::EmbedError;

/// Model location and tokenization limits.
#[derive(Debug, Clone)]
pub struct OnnxConfig {
    /// Path to the ONNX model file
    pub model_path: PathBuf,
    /// Path to the tokenizer.json file
    pub tokenizer_path: PathBuf,
    /// Maximum sequence length for tokenization
    pub max_length: usize,
    /// Number of threads for inference (0 = auto)
    pub num_threads: usize,
}

impl Default for OnnxConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::new(),
            tokenizer_path: PathBuf::new(),
            max_length: 384,
            num_threads: 0,
        }
    }
}

pub struct OnnxEmbedder {
    session: Session,
    tokenizer: Tokenizer,
    config: OnnxConfig,
    dimension: usize,
    name: String,
}

impl OnnxEmbedder {
    /// Load the model and tokenizer, then measure the output dimension.
    pub fn load(config: OnnxConfig) -> Result<Self, EmbedError> {
        info!(
            "Loading embedding model from {} with tokenizer {}",
            config.model_path.display(),
            config.tokenizer_path.display()
        );

        if !config.model_path.exists() {
            return Err(EmbedError::ModelLoad(format!(
                "model file not found: {}",
                config.model_path.display()
            )));
        }
        if !config.tokenizer_path.exists() {
            return Err(EmbedError::TokenizerLoad(format!(
                "tokenizer file not found: {}",
                config.tokenizer_path.display()
            )));
        }

        let tokenizer = Tokenizer::from_file(&config.tokenizer_path)
            .map_err(|e| EmbedError::TokenizerLoad(e.to_string()))?;

        let mut session_builder = Session::builder()
            .map_err(|e| EmbedError::ModelLoad(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| EmbedError::ModelLoad(e.to_string()))?;

        if config.num_threads > 0 {
            session_builder = session_builder
                .with_intra_threads(config.num_threads)
                .map_err(|e| EmbedError::ModelLoad(e.to_string()))?;
        }

        let session = session_builder
            .commit_from_file(&config.model_path)
            .map_err(|e| EmbedError::ModelLoad(e.to_string()))?;

        let name = format!("onnx-{}", model_stem(&config.model_path));
        let mut embedder = Self {
            session,
            tokenizer,
            config,
            dimension: 0,
            name,
        };
        let sample = embedder.run(&["dimension check".to_string()])?;
        embedder.dimension = sample
            .first()
            .map(Vec::len)
            .ok_or_else(|| EmbedError::Inference("model produced no embedding".to_string()))?;
        embedder.name = format!("{}-{}", embedder.name, embedder.dimension);

        info!("Embedding model loaded ({} dimensions)", embedder.dimension);
        Ok(embedder)
    }

    fn run(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| EmbedError::Tokenization(e.to_string()))?;

        let batch_size = encodings.len();
        let max_len = self.config.max_length;

        let mut input_ids: Vec<i64> = Vec::with_capacity(batch_size * max_len);
        let mut attention_mask: Vec<i64> = Vec::with_capacity(batch_size * max_len);

        for encoding in &encodings {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();

            // Pad or truncate to max_length
            for i in 0..max_len {
                if i < ids.len() {
                    input_ids.push(ids[i] as i64);
                    attention_mask.push(mask[i] as i64);
                } else {
                    input_ids.push(0);
                    attention_mask.push(0);
                }
            }
        }

        let input_ids = Array2::from_shape_vec((batch_size, max_len), input_ids).map_err(|e| {
            EmbedError::Inference(format!("failed to create input_ids tensor: {}", e))
        })?;
        let attention_mask = Array2::from_shape_vec((batch_size, max_len), attention_mask)
            .map_err(|e| {
                EmbedError::Inference(format!("failed to create attention_mask tensor: {}", e))
            })?;

        let outputs = self
            .session
            .run(
                ort::inputs! {
                    "input_ids" => input_ids,
                    "attention_mask" => attention_mask.clone(),
                }
                .map_err(|e| EmbedError::Inference(e.to_string()))?,
            )
            .map_err(|e| EmbedError::Inference(e.to_string()))?;

        let embeddings = outputs
            .get("sentence_embedding")
            .or_else(|| outputs.get("last_hidden_state"))
            .ok_or_else(|| EmbedError::Inference("no embedding output found".to_string()))?;
        let embeddings: ndarray::ArrayViewD<f32> = embeddings
            .try_extract_tensor()
            .map_err(|e| EmbedError::Inference(e.to_string()))?;

        let mut result = Vec::with_capacity(batch_size);
        match embeddings.shape().len() {
            // [batch, hidden]: already pooled
            2 => {
                for i in 0..batch_size {
                    let mut embedding: Vec<f32> = embeddings
                        .slice(ndarray::s![i, ..])
                        .iter()
                        .copied()
                        .collect();
                    factcheck_core::similarity::normalize_in_place(&mut embedding);
                    result.push(embedding);
                }
            }
            // [batch, seq, hidden]: mean pool over unmasked tokens
            3 => {
                for i in 0..batch_size {
                    let tokens: ArrayView2<f32> = embeddings
                        .slice(ndarray::s![i, .., ..])
                        .into_dimensionality()
                        .map_err(|e| EmbedError::Inference(e.to_string()))?;
                    let mut embedding =
                        mean_pool(tokens, &attention_mask.slice(ndarray::s![i, ..]));
                    factcheck_core::similarity::normalize_in_place(&mut embedding);
                    result.push(embedding);
                }
            }
            _ => {
                return Err(EmbedError::Inference(format!(
                    "unexpected output shape: {:?}",
                    embeddings.shape()
                )))
            }
        }

        Ok(result)
    }
}

impl Embedder for OnnxEmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        self.run(texts)
    }
}

fn model_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string())
}

/// Mean pooling over token embeddings with attention mask.
fn mean_pool(tokens: ArrayView2<f32>, attention_mask: &ArrayView1<i64>) -> Vec<f32> {
    let hidden_size = tokens.shape()[1];
    let mut sum = vec![0.0f32; hidden_size];
    let mut count = 0.0f32;

    for (i, mask) in attention_mask.iter().enumerate() {
        if *mask == 1 {
            for (j, val) in tokens.slice(ndarray::s![i, ..]).iter().enumerate() {
                sum[j] += val;
            }
            count += 1.0;
        }
    }

    if count > 0.0 {
        for val in &mut sum {
            *val /= count;
        }
    }

    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn mean_pool_ignores_masked_tokens() {
        let tokens = array![[1.0f32, 2.0], [3.0, 4.0], [100.0, 100.0]];
        let mask = array![1i64, 1, 0];
        assert_eq!(mean_pool(tokens.view(), &mask.view()), vec![2.0, 3.0]);
    }

    #[test]
    fn missing_model_is_reported() {
        let err = OnnxEmbedder::load(OnnxConfig {
            model_path: PathBuf::from("/nonexistent/model.onnx"),
            ..OnnxConfig::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, EmbedError::ModelLoad(_)));
    }
}
