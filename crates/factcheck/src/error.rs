//! Top-level error type for the factcheck crate.

use thiserror::Error;

use crate::config::ConfigError;
use crate::pipeline::PipelineError;

#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Index build or load error
    #[error(transparent)]
    Index(#[from] factcheck_index::IndexError),

    /// Pipeline error
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Result type alias using the factcheck Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn lower_layer_errors_convert() {
        let err: Error =
            factcheck_index::IndexError::NotFound(PathBuf::from("data/facts.index")).into();
        assert!(matches!(err, Error::Index(_)));
        assert_eq!(err.to_string(), "index artifact not found at data/facts.index");

        let err: Error = PipelineError::EmptyInput.into();
        assert_eq!(err.to_string(), "input text is empty");

        let err: Error = ConfigError::Invalid("top_k must be at least 1".into()).into();
        assert!(err.to_string().starts_with("configuration error: "));
    }
}
