//! End-to-end pipeline runs against a real on-disk index and a fake adjudicator.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use factcheck::core::{ClaimExtractor, VerdictLabel};
use factcheck::index::{EmbeddingIndex, HashingEmbedder, IndexPaths};
use factcheck::{
    FactChecker, GenerateError, PipelineError, PipelineSettings, RetryPolicy, TextGenerator,
    VerdictSynthesizer,
};
use pretty_assertions::assert_eq;

/// Always answers with the same response and counts calls.
struct FixedGenerator {
    response: Result<String, String>,
    calls: AtomicUsize,
}

impl FixedGenerator {
    fn answering(response: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(response.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FixedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(GenerateError::InvalidResponse(message.clone())),
        }
    }
}

const FACTS: &[&str] = &[
    "The Eiffel Tower is located in Paris.",
    "India's Renewable Energy Dev. Agency sanctioned Rs. 2005 crores",
    "Mount Everest is the highest mountain on Earth.",
    "Water boils at 100 degrees Celsius at sea level.",
];

fn build_index(dir: &Path) -> Arc<EmbeddingIndex> {
    let index = EmbeddingIndex::new(
        IndexPaths::in_dir(dir),
        Arc::new(HashingEmbedder::default()),
    );
    let facts: Vec<String> = FACTS.iter().map(|s| s.to_string()).collect();
    index.build(&facts).unwrap();
    index.close();
    Arc::new(index)
}

fn checker(index: Arc<EmbeddingIndex>, generator: Arc<FixedGenerator>) -> FactChecker {
    let retry = RetryPolicy {
        max_attempts: 2,
        initial_backoff: Duration::from_millis(1),
        timeout: Duration::from_secs(5),
    };
    FactChecker::new(
        index,
        ClaimExtractor::new(),
        VerdictSynthesizer::new(generator, retry),
        PipelineSettings::default(),
    )
}

#[tokio::test]
async fn eiffel_tower_in_berlin_is_false() {
    let dir = tempfile::tempdir().unwrap();
    let generator = FixedGenerator::answering(
        r#"{"verdict": "False", "confidence": 0.95, "reasoning": "The evidence places the Eiffel Tower in Paris, not Berlin."}"#,
    );
    let checker = checker(build_index(dir.path()), generator.clone());

    let report = checker
        .run("The Eiffel Tower is located in Berlin.")
        .await
        .unwrap();
    assert_eq!(report.input_text, "The Eiffel Tower is located in Berlin.");
    assert_eq!(report.extracted_claim, "The Eiffel Tower is located in Berlin.");
    assert_eq!(report.verdict, VerdictLabel::False);
    assert_eq!(report.confidence, "0.95");
    assert_eq!(
        report.evidence,
        vec!["The Eiffel Tower is located in Paris.".to_string()]
    );
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn normalized_match_needs_no_adjudicator() {
    let dir = tempfile::tempdir().unwrap();
    let generator = FixedGenerator::failing("must not be called");
    let checker = checker(build_index(dir.path()), generator.clone());

    let report = checker
        .run("For example, IREDA sanctioned ₹2,005 crore")
        .await
        .unwrap();
    assert_eq!(report.extracted_claim, "IREDA sanctioned ₹2,005 crore");
    assert_eq!(report.verdict, VerdictLabel::True);
    assert_eq!(report.confidence, "1.00");
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn unrelated_claim_is_unverifiable_without_remote_call() {
    let dir = tempfile::tempdir().unwrap();
    let generator = FixedGenerator::failing("must not be called");
    let checker = checker(build_index(dir.path()), generator.clone());

    let report = checker
        .run("Quantum chromodynamics describes gluons.")
        .await
        .unwrap();
    assert_eq!(report.verdict, VerdictLabel::Unverifiable);
    assert_eq!(report.confidence, "0.00");
    assert!(report.evidence.is_empty());
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn adjudicator_failure_is_recovered() {
    let dir = tempfile::tempdir().unwrap();
    let generator = FixedGenerator::failing("backend exploded");
    let checker = checker(build_index(dir.path()), generator.clone());

    let report = checker
        .run("The Eiffel Tower is located in Berlin.")
        .await
        .unwrap();
    assert_eq!(report.verdict, VerdictLabel::Unverifiable);
    assert_eq!(report.confidence, "0.00");
    assert!(report.reasoning.contains("backend exploded"));
    // Not transient: a single attempt.
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn missing_index_is_a_precondition_failure() {
    let dir = tempfile::tempdir().unwrap();
    let index = Arc::new(EmbeddingIndex::new(
        IndexPaths::in_dir(dir.path()),
        Arc::new(HashingEmbedder::default()),
    ));
    let checker = checker(index, FixedGenerator::failing("unused"));

    let err = checker.run("Some claim about anything.").await.unwrap_err();
    assert!(matches!(err, PipelineError::IndexMissing(_)));
    assert!(err.to_string().contains("factcheck build"));
}

#[tokio::test]
async fn blank_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let checker = checker(build_index(dir.path()), FixedGenerator::failing("unused"));
    assert!(matches!(
        checker.run("   \n").await,
        Err(PipelineError::EmptyInput)
    ));
}

#[tokio::test]
async fn close_releases_and_next_run_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let index = build_index(dir.path());
    let checker = checker(Arc::clone(&index), FixedGenerator::failing("unused"));

    checker.run("Mount Everest is the highest mountain on Earth.").await.unwrap();
    assert!(index.is_loaded());
    checker.close();
    assert!(!index.is_loaded());

    let report = checker
        .run("Mount Everest is the highest mountain on Earth.")
        .await
        .unwrap();
    assert_eq!(report.verdict, VerdictLabel::True);
    assert!(index.is_loaded());
}
