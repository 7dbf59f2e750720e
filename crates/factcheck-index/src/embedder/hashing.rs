//! Deterministic feature-hashing embedder.
//!
//! Text is first put through surface normalization (so `Rs. 2005 crores` and
//! `₹2,005 crore` embed alike). Each word unigram and adjacent-word bigram is
//! then hashed with SHA-256 into one of `dimension` buckets with a sign bit,
//! and the result is L2-normalized. No model files, identical output in every
//! process.

use factcheck_core::normalize;
use factcheck_core::similarity::normalize_in_place;
use sha2::{Digest, Sha256};

use super::Embedder;
use crate::error::EmbedError;

pub const DEFAULT_DIMENSION: usize = 384;

const UNIGRAM_WEIGHT: f32 = 1.0;
const BIGRAM_WEIGHT: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
    name: String,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl HashingEmbedder {
    /// `dimension` must be non-zero; a zero dimension is bumped to 1.
    pub fn new(dimension: usize) -> Self {
        let dimension = dimension.max(1);
        Self {
            dimension,
            name: format!("hashing-sha256-{dimension}"),
        }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        let normalized = normalize(text);
        let words = words(&normalized);

        for word in &words {
            self.add_feature(&mut vector, "u", word, UNIGRAM_WEIGHT);
        }
        for pair in words.windows(2) {
            let bigram = format!("{} {}", pair[0], pair[1]);
            self.add_feature(&mut vector, "b", &bigram, BIGRAM_WEIGHT);
        }

        normalize_in_place(&mut vector);
        vector
    }

    fn add_feature(&self, vector: &mut [f32], kind: &str, feature: &str, weight: f32) {
        let digest = Sha256::new()
            .chain_update(kind.as_bytes())
            .chain_update([0u8])
            .chain_update(feature.as_bytes())
            .finalize();

        let mut bucket = [0u8; 8];
        bucket.copy_from_slice(&digest[..8]);
        let slot = (u64::from_le_bytes(bucket) % self.dimension as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        vector[slot] += sign * weight;
    }
}

impl Embedder for HashingEmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}

/// Lowercased alphanumeric runs.
fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}
