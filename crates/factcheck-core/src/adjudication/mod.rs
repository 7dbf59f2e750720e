//! Remote adjudication boundary: prompt construction and response decoding.
//!
//! The remote model is opaque (prompt text in, text out). This module owns
//! the two pure halves of that exchange so the network client stays thin.

mod decode;
mod prompt;

pub use decode::{decode_verdict, AdjudicatedVerdict, DecodeError};
pub use prompt::AdjudicationPromptBuilder;

/// What the adjudicator is asked: one claim and its unnormalized evidence.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjudicationRequest<'a> {
    pub claim: &'a str,
    pub evidence: &'a [String],
}

impl<'a> AdjudicationRequest<'a> {
    pub fn new(claim: &'a str, evidence: &'a [String]) -> Self {
        Self { claim, evidence }
    }
}

