//! Client for a text-generation-inference style `POST /generate`, local
//! (`http://`) or hosted (`https://`, e.g. the HuggingFace inference API).
//!
//! The request itself is a blocking `ureq` call run on tokio's blocking pool.

use std::time::Duration;

use async_trait::async_trait;
use http::{StatusCode, Uri};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{GenerateError, GenerationParams, TextGenerator};

/// Longest error body echoed back in a `Status` error.
const MAX_ERROR_BODY: usize = 512;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct GenerateRequest<'a> {
    inputs: &'a str,
    parameters: Parameters,
}

#[derive(Serialize)]
struct Parameters {
    temperature: f32,
    max_new_tokens: u32,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerateResponse {
    Single(Generated),
    Batch(Vec<Generated>),
}

#[derive(Debug, Deserialize)]
struct Generated {
    generated_text: String,
}

pub struct HttpGenerator {
    uri: Uri,
    agent: ureq::Agent,
    token: Option<String>,
    params: GenerationParams,
}

impl HttpGenerator {
    pub fn new(endpoint: &str, params: GenerationParams) -> Result<Self, GenerateError> {
        let uri: Uri = endpoint
            .parse()
            .map_err(|e| GenerateError::InvalidEndpoint(format!("{endpoint}: {e}")))?;
        match uri.scheme_str() {
            Some("http" | "https") => {}
            Some(other) => {
                return Err(GenerateError::InvalidEndpoint(format!(
                    "{endpoint}: scheme {other} is not supported, use http:// or https://"
                )))
            }
            None => {
                return Err(GenerateError::InvalidEndpoint(format!(
                    "{endpoint}: missing http:// or https:// scheme"
                )))
            }
        }
        if uri.host().is_none() {
            return Err(GenerateError::InvalidEndpoint(format!(
                "{endpoint}: missing host"
            )));
        }

        Ok(Self {
            uri,
            agent: build_agent(DEFAULT_TIMEOUT),
            token: None,
            params,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Overall limit for one request, connect through body.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = build_agent(timeout);
        self
    }

    pub fn endpoint(&self) -> &Uri {
        &self.uri
    }

    fn request_body(&self, prompt: &str) -> Result<Vec<u8>, GenerateError> {
        serde_json::to_vec(&GenerateRequest {
            inputs: prompt,
            parameters: Parameters {
                temperature: self.params.temperature,
                max_new_tokens: self.params.max_new_tokens,
                return_full_text: false,
            },
        })
        .map_err(|e| GenerateError::InvalidEndpoint(format!("failed to encode request: {e}")))
    }
}

fn build_agent(timeout: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(timeout)
        .user_agent(concat!("factcheck/", env!("CARGO_PKG_VERSION")))
        .build()
}

#[async_trait]
impl TextGenerator for HttpGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let body = self.request_body(prompt)?;
        debug!("POST {} ({} byte body)", self.uri, body.len());

        let mut request = self
            .agent
            .post(&self.uri.to_string())
            .set("Content-Type", "application/json")
            .set("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        let authority = self
            .uri
            .authority()
            .map(|a| a.to_string())
            .unwrap_or_default();
        let text = tokio::task::spawn_blocking(move || send(request, &body, authority))
            .await
            .map_err(|e| GenerateError::Io(std::io::Error::other(e.to_string())))??;
        debug!("Endpoint answered ({} byte body)", text.len());

        let parsed: GenerateResponse = serde_json::from_str(&text).map_err(|e| {
            GenerateError::InvalidResponse(format!("unexpected generation body: {e}"))
        })?;
        match parsed {
            GenerateResponse::Single(generated) => Ok(generated.generated_text),
            GenerateResponse::Batch(batch) => batch
                .into_iter()
                .next()
                .map(|generated| generated.generated_text)
                .ok_or_else(|| GenerateError::InvalidResponse("empty generation list".into())),
        }
    }
}

/// Perform the request and read the success body.
fn send(request: ureq::Request, body: &[u8], authority: String) -> Result<String, GenerateError> {
    match request.send_bytes(body) {
        Ok(response) => Ok(response.into_string()?),
        Err(ureq::Error::Status(code, response)) => {
            let status = StatusCode::from_u16(code)
                .map_err(|_| GenerateError::InvalidResponse(format!("bad status code {code}")))?;
            let mut body = response.into_string().unwrap_or_default();
            truncate_chars(&mut body, MAX_ERROR_BODY);
            Err(GenerateError::Status { status, body })
        }
        Err(ureq::Error::Transport(transport)) => Err(transport_error(transport, authority)),
    }
}

fn transport_error(transport: ureq::Transport, authority: String) -> GenerateError {
    let message = transport.to_string();
    match transport.kind() {
        ureq::ErrorKind::Dns | ureq::ErrorKind::ConnectionFailed => GenerateError::Connect {
            authority,
            source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, message),
        },
        ureq::ErrorKind::Io => GenerateError::Io(std::io::Error::other(message)),
        ureq::ErrorKind::InvalidUrl | ureq::ErrorKind::UnknownScheme => {
            GenerateError::InvalidEndpoint(message)
        }
        _ => GenerateError::InvalidResponse(message),
    }
}

fn truncate_chars(text: &mut String, max: usize) {
    if let Some((cut, _)) = text.char_indices().nth(max) {
        text.truncate(cut);
    }
}
