//! Verdict synthesis: deterministic normalized match first, remote
//! adjudication as the fallback.
//!
//! Synthesis is total. Every remote or decode failure becomes an
//! `Unverifiable` verdict with zero confidence and the failure as reasoning.

use std::sync::Arc;
use std::time::Duration;

use factcheck_core::{
    decode_verdict, find_normalized_match, AdjudicationPromptBuilder, AdjudicationRequest,
    DecodeError, Verdict, VerdictLabel,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::generator::{GenerateError, TextGenerator};

pub const NO_EVIDENCE_REASONING: &str = "No relevant evidence found in the trusted fact base.";

/// Bounded retry for the remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles after each failure
    pub initial_backoff: Duration,
    /// Limit for each attempt
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Why remote adjudication produced no usable verdict.
#[derive(Error, Debug)]
pub enum AdjudicationError {
    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("could not decode adjudicator response: {0}")]
    Decode(#[from] DecodeError),
}

pub struct VerdictSynthesizer {
    generator: Arc<dyn TextGenerator>,
    prompts: AdjudicationPromptBuilder,
    retry: RetryPolicy,
}

impl VerdictSynthesizer {
    pub fn new(generator: Arc<dyn TextGenerator>, retry: RetryPolicy) -> Self {
        Self {
            generator,
            prompts: AdjudicationPromptBuilder::new(),
            retry,
        }
    }

    pub fn with_prompt_builder(mut self, prompts: AdjudicationPromptBuilder) -> Self {
        self.prompts = prompts;
        self
    }

    /// Judge `claim` against `evidence` (most relevant first).
    pub async fn synthesize(&self, claim: &str, evidence: &[String]) -> Verdict {
        if evidence.is_empty() {
            debug!("No evidence; skipping adjudication");
            return Verdict::unverifiable(NO_EVIDENCE_REASONING, Vec::new());
        }

        if let Some(position) = find_normalized_match(claim, evidence) {
            info!("Normalized claim matches evidence item {}", position);
            return Verdict::new(
                VerdictLabel::True,
                1.0,
                format!(
                    "The claim matches verified evidence after normalization: \"{}\"",
                    evidence[position]
                ),
                evidence.to_vec(),
            );
        }

        match self.adjudicate(claim, evidence).await {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!("Adjudication failed: {}", e);
                Verdict::unverifiable(
                    format!("An error occurred during verification: {e}"),
                    evidence.to_vec(),
                )
            }
        }
    }

    async fn adjudicate(
        &self,
        claim: &str,
        evidence: &[String],
    ) -> Result<Verdict, AdjudicationError> {
        let prompt = self
            .prompts
            .build(&AdjudicationRequest::new(claim, evidence));
        let response = self.generate_with_retry(&prompt).await?;
        let decoded = decode_verdict(&response)?;

        info!(
            "Adjudicator returned {} ({:.2})",
            decoded.label, decoded.confidence
        );
        Ok(Verdict::new(
            decoded.label,
            decoded.confidence,
            decoded.reasoning,
            evidence.to_vec(),
        ))
    }

    async fn generate_with_retry(&self, prompt: &str) -> Result<String, GenerateError> {
        let attempts = self.retry.max_attempts.max(1);
        let mut backoff = self.retry.initial_backoff;
        let mut attempt = 1;

        loop {
            let result = match tokio::time::timeout(
                self.retry.timeout,
                self.generator.generate(prompt),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(GenerateError::Timeout(self.retry.timeout)),
            };

            match result {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && attempt < attempts => {
                    warn!(
                        "Adjudicator attempt {}/{} failed: {}; retrying in {:?}",
                        attempt, attempts, e, backoff
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;

    /// Replays scripted results and counts calls.
    struct ScriptedGenerator {
        script: Mutex<VecDeque<Result<String, GenerateError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(script: Vec<Result<String, GenerateError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.lock().len()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
            self.calls.lock().push(prompt.to_string());
            self.script
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(GenerateError::InvalidResponse("script exhausted".into())))
        }
    }

    /// Never answers.
    struct StalledGenerator;

    #[async_trait]
    impl TextGenerator for StalledGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
            std::future::pending().await
        }
    }

    fn fast_retry(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff: Duration::from_millis(1),
            timeout: Duration::from_secs(5),
        }
    }

    fn evidence(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    const FALSE_JSON: &str =
        r#"{"verdict": "False", "confidence": 0.95, "reasoning": "The tower is in Paris."}"#;

    #[tokio::test]
    async fn no_evidence_skips_the_adjudicator() {
        let generator = ScriptedGenerator::new(vec![]);
        let synthesizer = VerdictSynthesizer::new(generator.clone(), fast_retry(3));

        let verdict = synthesizer.synthesize("Anything at all", &[]).await;
        assert_eq!(verdict.label(), VerdictLabel::Unverifiable);
        assert_eq!(verdict.confidence(), 0.0);
        assert!(verdict.reasoning().to_lowercase().contains("no relevant evidence found"));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn normalized_match_is_true_without_remote_call() {
        let generator = ScriptedGenerator::new(vec![]);
        let synthesizer = VerdictSynthesizer::new(generator.clone(), fast_retry(3));

        let evidence = evidence(&[
            "The Eiffel Tower is located in Paris.",
            "India's Renewable Energy Dev. Agency sanctioned Rs. 2005 crores",
        ]);
        let verdict = synthesizer
            .synthesize("IREDA sanctioned ₹2,005 crore", &evidence)
            .await;
        assert_eq!(verdict.label(), VerdictLabel::True);
        assert_eq!(verdict.confidence(), 1.0);
        assert!(verdict.reasoning().contains("Rs. 2005 crores"));
        assert_eq!(verdict.evidence(), evidence.as_slice());
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn adjudicator_verdict_is_used() {
        let generator = ScriptedGenerator::new(vec![Ok(FALSE_JSON.to_string())]);
        let synthesizer = VerdictSynthesizer::new(generator.clone(), fast_retry(3));

        let evidence = evidence(&["The Eiffel Tower is located in Paris."]);
        let verdict = synthesizer
            .synthesize("The Eiffel Tower is located in Berlin.", &evidence)
            .await;
        assert_eq!(verdict.label(), VerdictLabel::False);
        assert_eq!(verdict.confidence(), 0.95);
        assert_eq!(verdict.reasoning(), "The tower is in Paris.");

        let prompt = generator.calls.lock()[0].clone();
        assert!(prompt.contains("USER_CLAIM: \"The Eiffel Tower is located in Berlin.\""));
        assert!(prompt.contains("- The Eiffel Tower is located in Paris."));
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let generator = ScriptedGenerator::new(vec![
            Err(GenerateError::Io(std::io::ErrorKind::ConnectionReset.into())),
            Err(GenerateError::Status {
                status: http::StatusCode::SERVICE_UNAVAILABLE,
                body: String::new(),
            }),
            Ok(FALSE_JSON.to_string()),
        ]);
        let synthesizer = VerdictSynthesizer::new(generator.clone(), fast_retry(3));

        let verdict = synthesizer
            .synthesize("The Eiffel Tower is located in Berlin.", &evidence(&["x y z"]))
            .await;
        assert_eq!(verdict.label(), VerdictLabel::False);
        assert_eq!(generator.calls(), 3);
    }

    #[tokio::test]
    async fn retries_are_bounded() {
        let generator = ScriptedGenerator::new(vec![
            Err(GenerateError::Io(std::io::ErrorKind::ConnectionReset.into())),
            Err(GenerateError::Io(std::io::ErrorKind::ConnectionReset.into())),
            Ok(FALSE_JSON.to_string()),
        ]);
        let synthesizer = VerdictSynthesizer::new(generator.clone(), fast_retry(2));

        let verdict = synthesizer.synthesize("claim", &evidence(&["fact"])).await;
        assert_eq!(verdict.label(), VerdictLabel::Unverifiable);
        assert_eq!(verdict.confidence(), 0.0);
        assert!(verdict.reasoning().contains("error"));
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn permanent_and_decode_failures_are_not_retried() {
        let generator = ScriptedGenerator::new(vec![Err(GenerateError::Status {
            status: http::StatusCode::UNAUTHORIZED,
            body: "bad token".into(),
        })]);
        let synthesizer = VerdictSynthesizer::new(generator.clone(), fast_retry(3));
        let verdict = synthesizer.synthesize("claim", &evidence(&["fact"])).await;
        assert_eq!(verdict.label(), VerdictLabel::Unverifiable);
        assert!(verdict.reasoning().contains("401"));
        assert_eq!(generator.calls(), 1);

        let generator =
            ScriptedGenerator::new(vec![Ok("The claim is false.".into()), Ok(FALSE_JSON.into())]);
        let synthesizer = VerdictSynthesizer::new(generator.clone(), fast_retry(3));
        let verdict = synthesizer.synthesize("claim", &evidence(&["fact"])).await;
        assert_eq!(verdict.label(), VerdictLabel::Unverifiable);
        assert_eq!(verdict.confidence(), 0.0);
        assert!(verdict.reasoning().contains("decode"));
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn timeout_becomes_unverifiable() {
        let synthesizer = VerdictSynthesizer::new(
            Arc::new(StalledGenerator),
            RetryPolicy {
                max_attempts: 2,
                initial_backoff: Duration::from_millis(1),
                timeout: Duration::from_millis(20),
            },
        );
        let verdict = synthesizer.synthesize("claim", &evidence(&["fact"])).await;
        assert_eq!(verdict.label(), VerdictLabel::Unverifiable);
        assert_eq!(verdict.confidence(), 0.0);
        assert!(verdict.reasoning().contains("timed out"));
    }
}
