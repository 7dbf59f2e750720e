//! Remote text generation capability.
//!
//! The adjudicator is an opaque remote function: prompt text in, text out.
//! Failures are classified so callers can retry only what may succeed on a
//! second try.

mod tgi;

pub use tgi::HttpGenerator;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_new_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_new_tokens: 512,
        }
    }
}

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("failed to connect to {authority}: {source}")]
    Connect {
        authority: String,
        source: std::io::Error,
    },

    #[error("connection error: {0}")]
    Io(#[from] std::io::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("endpoint returned HTTP {status}: {body}")]
    Status {
        status: http::StatusCode,
        body: String,
    },

    #[error("malformed HTTP response: {0}")]
    InvalidResponse(String),

    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(String),
}

impl GenerateError {
    /// Connection problems, timeouts, throttling and server errors.
    pub fn is_transient(&self) -> bool {
        match self {
            GenerateError::Connect { .. } | GenerateError::Io(_) | GenerateError::Timeout(_) => {
                true
            }
            GenerateError::Status { status, .. } => {
                *status == http::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            GenerateError::InvalidResponse(_) | GenerateError::InvalidEndpoint(_) => false,
        }
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete `prompt`, returning only the generated text.
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}
