//! Factcheck Core Engine
//!
//! The I/O-free half of the fact verification pipeline: everything that can
//! be computed from strings alone lives here, so it is deterministic and
//! testable without an index on disk or a network.
//!
//! # Modules
//!
//! - `syntax` - tokenizer, lexicon tagger and rule-based dependency parser
//! - `extract` - claim extraction from free text
//! - `normalize` - surface normalization and substring matching
//! - `verdict` - the verdict model
//! - `adjudication` - prompt construction and strict response decoding
//! - `similarity` - L2 distance and distance-to-similarity mapping
//!
//! # Example
//!
//! ```rust
//! use factcheck_core::{find_normalized_match, ClaimExtractor};
//!
//! let extractor = ClaimExtractor::new();
//! let claim = extractor.extract("For example, IREDA sanctioned ₹2,005 crore");
//! assert_eq!(claim, "IREDA sanctioned ₹2,005 crore");
//!
//! let evidence = ["India's Renewable Energy Dev. Agency sanctioned Rs. 2005 crores"];
//! assert_eq!(find_normalized_match(&claim, &evidence), Some(0));
//! ```

pub mod adjudication;
pub mod extract;
pub mod normalize;
pub mod similarity;
pub mod syntax;
pub mod verdict;

// Re-export main types at crate root
pub use adjudication::{
    decode_verdict, AdjudicatedVerdict, AdjudicationPromptBuilder, AdjudicationRequest,
    DecodeError,
};
pub use extract::{ClaimExtractor, SHORT_CLAIM_TOKENS};
pub use normalize::{find_normalized_match, normalize};
pub use similarity::{l2_distance, similarity_from_distance};
pub use syntax::{Dep, ParseTree, Pos, ShallowParser, SyntaxParser, Token};
pub use verdict::{ParseLabelError, Verdict, VerdictLabel};
