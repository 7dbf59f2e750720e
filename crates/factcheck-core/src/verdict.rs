//! Verdict model shared by the synthesizer, the pipeline and the CLI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of verifying a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerdictLabel {
    True,
    False,
    Unverifiable,
    /// Only used to render pipeline failures; never produced by synthesis.
    Error,
}

impl VerdictLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictLabel::True => "True",
            VerdictLabel::False => "False",
            VerdictLabel::Unverifiable => "Unverifiable",
            VerdictLabel::Error => "Error",
        }
    }
}

impl fmt::Display for VerdictLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown verdict label: {0:?}")]
pub struct ParseLabelError(pub String);

impl FromStr for VerdictLabel {
    type Err = ParseLabelError;

    /// Exact, case-sensitive match on the rendered label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "True" => Ok(VerdictLabel::True),
            "False" => Ok(VerdictLabel::False),
            "Unverifiable" => Ok(VerdictLabel::Unverifiable),
            "Error" => Ok(VerdictLabel::Error),
            other => Err(ParseLabelError(other.to_string())),
        }
    }
}

/// A final verdict. Immutable once constructed; confidence is always in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(rename = "verdict")]
    label: VerdictLabel,
    confidence: f64,
    reasoning: String,
    evidence: Vec<String>,
}

impl Verdict {
    pub fn new(
        label: VerdictLabel,
        confidence: f64,
        reasoning: impl Into<String>,
        evidence: Vec<String>,
    ) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            label,
            confidence,
            reasoning: reasoning.into(),
            evidence,
        }
    }

    /// `Unverifiable` with zero confidence.
    pub fn unverifiable(reasoning: impl Into<String>, evidence: Vec<String>) -> Self {
        Self::new(VerdictLabel::Unverifiable, 0.0, reasoning, evidence)
    }

    pub fn label(&self) -> VerdictLabel {
        self.label
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Confidence rendered with two decimals ("0.85").
    pub fn confidence_display(&self) -> String {
        format!("{:.2}", self.confidence)
    }

    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    pub fn evidence(&self) -> &[String] {
        &self.evidence
    }
}
