//! The embedding index: build, lazy load, search, close.

use std::sync::Arc;

use factcheck_core::similarity_from_distance;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};

use crate::artifacts::{self, IndexPaths};
use crate::embedder::Embedder;
use crate::error::{IndexError, Result};
use crate::flat::FlatL2Index;

/// Statements embedded per `embed_batch` call during a build.
const BUILD_BATCH_SIZE: usize = 64;

/// One retrieved statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: usize,
    pub statement: String,
    pub distance: f32,
    /// `1 / (1 + distance)`, in (0, 1].
    pub similarity: f32,
}

struct Loaded {
    vectors: FlatL2Index,
    statements: Vec<String>,
}

/// Fact embeddings plus their statement texts, shared across requests.
pub struct EmbeddingIndex {
    paths: IndexPaths,
    embedder: Arc<dyn Embedder>,
    loaded: RwLock<Option<Arc<Loaded>>>,
}

impl EmbeddingIndex {
    pub fn new(paths: IndexPaths, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            paths,
            embedder,
            loaded: RwLock::new(None),
        }
    }

    pub fn paths(&self) -> &IndexPaths {
        &self.paths
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.read().is_some()
    }

    /// Embed and persist `statements`; ids follow input order.
    ///
    /// Overwrites existing artifacts. Returns the number of facts indexed.
    pub fn build(&self, statements: &[String]) -> Result<usize> {
        info!(
            "Building index of {} statements with {}",
            statements.len(),
            self.embedder.name()
        );

        let mut vectors = FlatL2Index::new(self.embedder.dimension());
        for batch in statements.chunks(BUILD_BATCH_SIZE) {
            for vector in self.embedder.embed_batch(batch)? {
                vectors.add(&vector)?;
            }
            debug!("Embedded {}/{} statements", vectors.len(), statements.len());
        }
        if vectors.len() != statements.len() {
            return Err(crate::error::EmbedError::Inference(format!(
                "embedder returned {} vectors for {} statements",
                vectors.len(),
                statements.len()
            ))
            .into());
        }

        artifacts::write_vectors(&self.paths.vectors, self.embedder.name(), &vectors)?;
        artifacts::write_statements(&self.paths.statements, statements)?;

        // Serve the fresh build from this instance.
        *self.loaded.write() = Some(Arc::new(Loaded {
            vectors,
            statements: statements.to_vec(),
        }));

        info!(
            "Index built with {} facts at {}",
            statements.len(),
            self.paths.vectors.display()
        );
        Ok(statements.len())
    }

    /// Read both artifacts from disk, replacing any loaded state.
    pub fn load(&self) -> Result<()> {
        let loaded = self.read_artifacts()?;
        info!("Index loaded with {} facts", loaded.statements.len());
        *self.loaded.write() = Some(Arc::new(loaded));
        Ok(())
    }

    /// Number of indexed facts, loading if needed.
    pub fn len(&self) -> Result<usize> {
        Ok(self.ensure_loaded()?.statements.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// The `k` statements nearest to `query`, most similar first.
    ///
    /// Equal similarities keep ascending id order. Returns fewer than `k`
    /// hits when the index is smaller.
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        let loaded = self.ensure_loaded()?;
        if k == 0 || loaded.statements.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed(query)?;
        let hits = loaded
            .vectors
            .search(&query_vector, k)?
            .into_iter()
            .map(|neighbor| SearchHit {
                id: neighbor.id,
                statement: loaded.statements[neighbor.id].clone(),
                distance: neighbor.distance,
                similarity: similarity_from_distance(neighbor.distance),
            })
            .collect::<Vec<_>>();

        debug!("Search returned {} hits for k={}", hits.len(), k);
        Ok(hits)
    }

    /// Drop the in-memory index; the next search reloads from disk.
    pub fn close(&self) {
        if self.loaded.write().take().is_some() {
            debug!("Index closed");
        }
    }

    fn ensure_loaded(&self) -> Result<Arc<Loaded>> {
        if let Some(loaded) = self.loaded.read().as_ref() {
            return Ok(Arc::clone(loaded));
        }

        let mut slot = self.loaded.write();
        if let Some(loaded) = slot.as_ref() {
            return Ok(Arc::clone(loaded));
        }
        let loaded = Arc::new(self.read_artifacts()?);
        info!("Index loaded with {} facts", loaded.statements.len());
        *slot = Some(Arc::clone(&loaded));
        Ok(loaded)
    }

    fn read_artifacts(&self) -> Result<Loaded> {
        let (header, vectors) = artifacts::read_vectors(&self.paths.vectors)?;
        let statements = artifacts::read_statements(&self.paths.statements)?;

        if header.embedder != self.embedder.name() || header.dimension != self.embedder.dimension()
        {
            return Err(IndexError::EmbedderMismatch {
                expected: format!("{} ({} dims)", self.embedder.name(), self.embedder.dimension()),
                found: format!("{} ({} dims)", header.embedder, header.dimension),
            });
        }
        if statements.len() != header.count {
            return Err(IndexError::corrupt(
                &self.paths.statements,
                format!(
                    "{} statements for {} vectors",
                    statements.len(),
                    header.count
                ),
            ));
        }

        Ok(Loaded {
            vectors,
            statements,
        })
    }
}
