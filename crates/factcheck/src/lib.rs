//! Factcheck
//!
//! Retrieval-augmented fact verification: extract the core claim from free
//! text, retrieve similar trusted facts from the embedding index, then
//! synthesize a True / False / Unverifiable verdict.
//!
//! # Modules
//!
//! - `config` - layered configuration
//! - `generator` - remote text generation capability and HTTP client
//! - `retriever` - top-k evidence retrieval with a similarity threshold
//! - `synthesizer` - normalized match and remote adjudication
//! - `pipeline` - [`FactChecker`], the end-to-end entry point
//! - `tracing` - logging setup

pub mod config;
pub mod error;
pub mod generator;
pub mod pipeline;
pub mod retriever;
pub mod synthesizer;
pub mod tracing;

// Re-export main types at crate root
pub use config::{Config, ConfigError};
pub use error::{Error, Result};
pub use generator::{GenerateError, GenerationParams, HttpGenerator, TextGenerator};
pub use pipeline::{is_blank, CheckReport, FactChecker, PipelineError, PipelineSettings};
pub use retriever::{EvidenceItem, EvidenceRetriever};
pub use synthesizer::{RetryPolicy, VerdictSynthesizer};

// Re-export the lower crates for downstream users
pub use factcheck_core as core;
pub use factcheck_index as index;
