//! The fact-checking pipeline: extract, retrieve, synthesize.

use std::path::PathBuf;
use std::sync::Arc;

use factcheck_core::{ClaimExtractor, ShallowParser, SyntaxParser, Verdict, VerdictLabel};
use factcheck_index::{EmbeddingIndex, IndexError};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::retriever::EvidenceRetriever;
use crate::synthesizer::VerdictSynthesizer;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("fact index not found at {}; run `factcheck build` first", .0.display())]
    IndexMissing(PathBuf),

    #[error("input text is empty")]
    EmptyInput,

    #[error("unexpected pipeline failure: {0}")]
    Unexpected(#[source] IndexError),
}

impl From<IndexError> for PipelineError {
    fn from(e: IndexError) -> Self {
        match e {
            IndexError::NotFound(path) => PipelineError::IndexMissing(path),
            other => PipelineError::Unexpected(other),
        }
    }
}

/// True for empty or whitespace-only input.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Retrieval parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSettings {
    pub top_k: usize,
    pub confidence_threshold: f32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            top_k: 3,
            confidence_threshold: 0.55,
        }
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub input_text: String,
    pub extracted_claim: String,
    pub verdict: VerdictLabel,
    /// Two decimals, e.g. `"0.95"`
    pub confidence: String,
    pub reasoning: String,
    pub evidence: Vec<String>,
}

impl CheckReport {
    fn from_verdict(input_text: &str, claim: String, verdict: Verdict) -> Self {
        Self {
            input_text: input_text.to_string(),
            extracted_claim: claim,
            verdict: verdict.label(),
            confidence: verdict.confidence_display(),
            reasoning: verdict.reasoning().to_string(),
            evidence: verdict.evidence().to_vec(),
        }
    }

    /// A pipeline failure rendered in the report shape, labelled `Error`.
    pub fn failure(input_text: &str, error: &PipelineError) -> Self {
        let verdict = Verdict::new(VerdictLabel::Error, 0.0, error.to_string(), Vec::new());
        Self::from_verdict(input_text, String::new(), verdict)
    }
}

pub struct FactChecker<P = ShallowParser> {
    index: Arc<EmbeddingIndex>,
    extractor: ClaimExtractor<P>,
    retriever: EvidenceRetriever,
    synthesizer: VerdictSynthesizer,
}

impl<P: SyntaxParser> FactChecker<P> {
    pub fn new(
        index: Arc<EmbeddingIndex>,
        extractor: ClaimExtractor<P>,
        synthesizer: VerdictSynthesizer,
        settings: PipelineSettings,
    ) -> Self {
        let retriever = EvidenceRetriever::new(
            Arc::clone(&index),
            settings.top_k,
            settings.confidence_threshold,
        );
        Self {
            index,
            extractor,
            retriever,
            synthesizer,
        }
    }

    /// Verify `raw_text` against the fact index.
    pub async fn run(&self, raw_text: &str) -> Result<CheckReport, PipelineError> {
        if is_blank(raw_text) {
            return Err(PipelineError::EmptyInput);
        }
        info!("Pipeline started");
        debug!("Raw input text: {}", raw_text);

        let claim = self.extractor.extract(raw_text);
        info!("Extracted claim: {}", claim);

        let evidence = match self.retriever.retrieve(&claim) {
            Ok(items) => items,
            Err(e) => {
                let e = PipelineError::from(e);
                if matches!(e, PipelineError::Unexpected(_)) {
                    error!("Pipeline failed during retrieval: {}", e);
                }
                return Err(e);
            }
        };
        info!("Retrieved {} pieces of evidence", evidence.len());
        let evidence: Vec<String> = evidence.into_iter().map(|item| item.statement).collect();

        let verdict = self.synthesizer.synthesize(&claim, &evidence).await;
        info!(
            "Verdict: {} (confidence {})",
            verdict.label(),
            verdict.confidence_display()
        );
        debug!("Reasoning: {}", verdict.reasoning());

        Ok(CheckReport::from_verdict(raw_text, claim, verdict))
    }

    /// Release the in-memory index. A later `run` reloads it.
    pub fn close(&self) {
        self.index.close();
        info!("Pipeline closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank(" \t\n "));
        assert!(!is_blank(" a "));
    }

    #[test]
    fn not_found_maps_to_index_missing_with_remediation() {
        let e = PipelineError::from(IndexError::NotFound(PathBuf::from("data/facts.index")));
        assert!(matches!(e, PipelineError::IndexMissing(_)));
        assert!(e.to_string().contains("run `factcheck build`"));

        let e = PipelineError::from(IndexError::MissingColumn("statement".into()));
        assert!(matches!(e, PipelineError::Unexpected(_)));
    }

    #[test]
    fn failure_report_uses_error_label() {
        let report = CheckReport::failure("text", &PipelineError::EmptyInput);
        assert_eq!(report.verdict, VerdictLabel::Error);
        assert_eq!(report.confidence, "0.00");
        assert_eq!(report.reasoning, "input text is empty");
    }
}
