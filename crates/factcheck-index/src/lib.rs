//! Factcheck Embedding Index
//!
//! Vector representations of trusted facts with exact nearest-neighbor
//! search by Euclidean distance.
//!
//! # Modules
//!
//! - `embedder` - the [`Embedder`] capability and its implementations
//! - `flat` - brute force L2 index over dense ids
//! - `artifacts` - on-disk vector and statement files
//! - `index` - [`EmbeddingIndex`]: build, lazy load, search, close
//! - `ingest` - fact CSV ingestion
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use factcheck_index::{EmbeddingIndex, HashingEmbedder, IndexPaths};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let index = EmbeddingIndex::new(
//!     IndexPaths::in_dir(dir.path()),
//!     Arc::new(HashingEmbedder::default()),
//! );
//! index.build(&["The Eiffel Tower is located in Paris.".to_string()]).unwrap();
//!
//! let hits = index.search("The Eiffel Tower is located in Paris.", 3).unwrap();
//! assert_eq!(hits.len(), 1);
//! assert!(hits[0].similarity > 0.99);
//! ```

pub mod artifacts;
pub mod embedder;
pub mod error;
pub mod flat;
pub mod index;
pub mod ingest;

// Re-export main types at crate root
pub use artifacts::IndexPaths;
#[cfg(feature = "onnx")]
pub use embedder::{OnnxConfig, OnnxEmbedder};
pub use embedder::{Embedder, HashingEmbedder};
pub use error::{EmbedError, IndexError, Result};
pub use flat::{FlatL2Index, Neighbor};
pub use index::{EmbeddingIndex, SearchHit};
pub use ingest::ingest_csv;
