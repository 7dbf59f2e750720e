//! Claim extraction: reduce free text to one concise assertion.
//!
//! The extractor is total. Every stage has a fallback, ending with the
//! untouched input, so a non-empty input always yields a non-empty claim.

mod markers;
mod sentences;

pub use markers::strip_markers;
pub use sentences::{is_declarative, longest_declarative, split_sentences};

use tracing::debug;

use crate::syntax::lexicon::COPULAR_LEMMAS;
use crate::syntax::{Dep, ParseTree, Pos, ShallowParser, SyntaxParser};

/// Inputs this short (after marker stripping) are already a claim.
pub const SHORT_CLAIM_TOKENS: usize = 10;

/// Extracts the core assertion from arbitrary input text.
#[derive(Debug, Clone, Default)]
pub struct ClaimExtractor<P = ShallowParser> {
    parser: P,
}

impl ClaimExtractor<ShallowParser> {
    pub fn new() -> Self {
        Self::with_parser(ShallowParser::new())
    }
}

impl<P: SyntaxParser> ClaimExtractor<P> {
    pub fn with_parser(parser: P) -> Self {
        Self { parser }
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Extract a claim from `text`. Never fails.
    pub fn extract(&self, text: &str) -> String {
        let normalized = strip_markers(text);
        let token_count = normalized.split_whitespace().count();
        if !normalized.is_empty() && token_count <= SHORT_CLAIM_TOKENS {
            debug!("Short input ({} tokens) used as claim", token_count);
            return normalized;
        }

        let sentences = split_sentences(&normalized);
        let selected = longest_declarative(&sentences).unwrap_or(&normalized);

        if let Some(claim) = self.structural_claim(selected) {
            debug!("Structural claim extracted: {}", claim);
            return claim;
        }

        let selected = selected.trim();
        if !selected.is_empty() {
            debug!("No subject-predicate structure, using selected sentence");
            return selected.to_string();
        }
        text.to_string()
    }

    /// Subject + predicate + complements of the sentence's root predicate.
    fn structural_claim(&self, sentence: &str) -> Option<String> {
        if sentence.trim().is_empty() {
            return None;
        }
        let tree = self.parser.parse(sentence);
        let root = tree.root()?;
        if !is_predicate(&tree, root) {
            return None;
        }

        let mut subjects = Vec::new();
        let mut auxiliaries = Vec::new();
        let mut complements = Vec::new();
        let mut has_auxiliary = false;

        for child in tree.children(root) {
            let token = tree.token(child);
            match token.dep {
                Dep::Nsubj | Dep::Nsubjpass => subjects.push(tree.subtree_text(child)),
                Dep::Aux | Dep::Auxpass if child < root => {
                    has_auxiliary = true;
                    auxiliaries.push(token.text.clone());
                }
                Dep::Neg if child < root => auxiliaries.push(token.text.clone()),
                Dep::Csubj => complements.push(tree.subtree_text(child)),
                Dep::Dobj
                | Dep::Attr
                | Dep::Acomp
                | Dep::Oprd
                | Dep::Xcomp
                | Dep::Prep
                | Dep::Advcl
                    if child > root =>
                {
                    complements.push(tree.subtree_text(child))
                }
                _ => {}
            }
        }

        let subject = subjects.into_iter().next()?;
        let root_token = tree.token(root);
        let predicate = if has_auxiliary {
            &root_token.lemma
        } else {
            &root_token.text
        };
        auxiliaries.push(predicate.clone());
        let complements: Vec<String> = complements.into_iter().filter(|c| !c.is_empty()).collect();

        let claim = format!("{} {} {}", subject, auxiliaries.join(" "), complements.join(" "));
        Some(claim.split_whitespace().collect::<Vec<_>>().join(" "))
    }
}

fn is_predicate(tree: &ParseTree, root: usize) -> bool {
    let token = tree.token(root);
    match token.pos {
        Pos::Verb => true,
        Pos::Aux => COPULAR_LEMMAS.contains(token.lemma.as_str()),
        _ => false,
    }
}
