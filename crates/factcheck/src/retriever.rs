//! Evidence retrieval: top-k search plus the similarity threshold.

use std::sync::Arc;

use factcheck_index::{EmbeddingIndex, IndexError};
use serde::Serialize;
use tracing::debug;

/// A retrieved statement and its similarity to the claim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvidenceItem {
    pub statement: String,
    pub similarity: f32,
}

pub struct EvidenceRetriever {
    index: Arc<EmbeddingIndex>,
    top_k: usize,
    threshold: f32,
}

impl EvidenceRetriever {
    pub fn new(index: Arc<EmbeddingIndex>, top_k: usize, threshold: f32) -> Self {
        Self {
            index,
            top_k,
            threshold,
        }
    }

    pub fn index(&self) -> &Arc<EmbeddingIndex> {
        &self.index
    }

    /// Up to `top_k` statements with similarity at or above the threshold,
    /// most similar first.
    pub fn retrieve(&self, claim: &str) -> Result<Vec<EvidenceItem>, IndexError> {
        let hits = self.index.search(claim, self.top_k)?;
        let candidates = hits.len();

        let evidence: Vec<EvidenceItem> = hits
            .into_iter()
            .filter(|hit| hit.similarity >= self.threshold)
            .map(|hit| EvidenceItem {
                statement: hit.statement,
                similarity: hit.similarity,
            })
            .collect();

        debug!(
            "Kept {} of {} candidates at threshold {:.2}",
            evidence.len(),
            candidates,
            self.threshold
        );
        Ok(evidence)
    }
}
