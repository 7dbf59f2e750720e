//! Text embedding capability.
//!
//! An [`Embedder`] maps text to a fixed-dimension `f32` vector. The index
//! persists the embedder's name and dimension next to the vectors and refuses
//! to serve queries from a different embedder.

mod hashing;
#[cfg(feature = "onnx")]
mod onnx;

pub use hashing::{HashingEmbedder, DEFAULT_DIMENSION};
#[cfg(feature = "onnx")]
pub use onnx::{OnnxConfig, OnnxEmbedder};

use crate::error::EmbedError;

pub trait Embedder: Send + Sync {
    /// Stable identifier written into the vector artifact.
    fn name(&self) -> &str;

    fn dimension(&self) -> usize;

    /// Embed a batch, preserving input order.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;

    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        self.embed_batch(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| EmbedError::Inference("no embedding generated".to_string()))
    }
}
