//! Error types for the embedding index.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning text into vectors.
#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    #[error("failed to load tokenizer: {0}")]
    TokenizerLoad(String),

    #[error("tokenization failed: {0}")]
    Tokenization(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Index errors.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("index artifact not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("corrupt index artifact {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("index was built with embedder {found}, but {expected} is configured")]
    EmbedderMismatch { expected: String, found: String },

    #[error("fact CSV is missing the required {0:?} column")]
    MissingColumn(String),

    #[error("query vector has dimension {found}, index expects {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("embedding failed: {0}")]
    Embed(#[from] EmbedError),
}

impl IndexError {
    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        IndexError::Corrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True when the artifacts simply have not been built yet.
    pub fn is_not_found(&self) -> bool {
        matches!(self, IndexError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, IndexError>;
