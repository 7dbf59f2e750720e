//! Syntactic analysis capability used by the claim extractor.
//!
//! The extractor only needs a dependency tree: tokens with a coarse part of
//! speech, a lemma, a dependency label and a head. Any backend producing a
//! [`ParseTree`] can be plugged in through [`SyntaxParser`]; the crate ships
//! [`ShallowParser`], a deterministic rule-based implementation.

pub mod lemma;
pub mod lexicon;
mod shallow;
pub mod tokenizer;

pub use shallow::ShallowParser;

use serde::Serialize;

/// Coarse part of speech (Universal Dependencies tag set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Pos {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    X,
}

impl Pos {
    /// Tokens that can head or sit inside a noun phrase.
    pub fn is_nominal(self) -> bool {
        matches!(self, Pos::Noun | Pos::Propn | Pos::Pron | Pos::Num)
    }
}

/// Dependency relation of a token to its head (ClearNLP label set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dep {
    Root,
    Nsubj,
    Nsubjpass,
    Csubj,
    Expl,
    Aux,
    Auxpass,
    Neg,
    Dobj,
    Dative,
    Attr,
    Acomp,
    Oprd,
    Xcomp,
    Ccomp,
    Prep,
    Pobj,
    Pcomp,
    Advcl,
    Advmod,
    Npadvmod,
    Relcl,
    Acl,
    Mark,
    Det,
    Amod,
    Compound,
    Nummod,
    Quantmod,
    Poss,
    Case,
    Cc,
    Conj,
    Punct,
    Dep,
}

impl Dep {
    pub fn as_str(self) -> &'static str {
        match self {
            Dep::Root => "ROOT",
            Dep::Nsubj => "nsubj",
            Dep::Nsubjpass => "nsubjpass",
            Dep::Csubj => "csubj",
            Dep::Expl => "expl",
            Dep::Aux => "aux",
            Dep::Auxpass => "auxpass",
            Dep::Neg => "neg",
            Dep::Dobj => "dobj",
            Dep::Dative => "dative",
            Dep::Attr => "attr",
            Dep::Acomp => "acomp",
            Dep::Oprd => "oprd",
            Dep::Xcomp => "xcomp",
            Dep::Ccomp => "ccomp",
            Dep::Prep => "prep",
            Dep::Pobj => "pobj",
            Dep::Pcomp => "pcomp",
            Dep::Advcl => "advcl",
            Dep::Advmod => "advmod",
            Dep::Npadvmod => "npadvmod",
            Dep::Relcl => "relcl",
            Dep::Acl => "acl",
            Dep::Mark => "mark",
            Dep::Det => "det",
            Dep::Amod => "amod",
            Dep::Compound => "compound",
            Dep::Nummod => "nummod",
            Dep::Quantmod => "quantmod",
            Dep::Poss => "poss",
            Dep::Case => "case",
            Dep::Cc => "cc",
            Dep::Conj => "conj",
            Dep::Punct => "punct",
            Dep::Dep => "dep",
        }
    }
}

/// A parsed token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub text: String,
    /// Whether whitespace followed this token in the source.
    pub whitespace: bool,
    pub lemma: String,
    pub pos: Pos,
    pub dep: Dep,
    /// Index of the head token; the root points at itself.
    pub head: usize,
}

/// A dependency tree over one sentence.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseTree {
    tokens: Vec<Token>,
}

impl ParseTree {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, index: usize) -> &Token {
        &self.tokens[index]
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Index of the syntactic root, if the tree has one.
    pub fn root(&self) -> Option<usize> {
        self.tokens.iter().position(|t| t.dep == Dep::Root)
    }

    /// Direct dependents of `index`, in sentence order.
    pub fn children(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .filter(move |(i, t)| *i != index && t.head == index)
            .map(|(i, _)| i)
    }

    /// All token indices dominated by `index` (inclusive), sorted.
    pub fn subtree(&self, index: usize) -> Vec<usize> {
        let mut out = vec![index];
        let mut stack = vec![index];
        while let Some(current) = stack.pop() {
            for child in self.children(current) {
                if !out.contains(&child) {
                    out.push(child);
                    stack.push(child);
                }
            }
        }
        out.sort_unstable();
        out
    }

    /// Source text of the subtree rooted at `index`, in original word order.
    pub fn subtree_text(&self, index: usize) -> String {
        let indices = self.subtree(index);
        let mut text = String::new();
        for (pos, &i) in indices.iter().enumerate() {
            let token = &self.tokens[i];
            text.push_str(&token.text);
            let contiguous = indices.get(pos + 1).is_some_and(|next| *next == i + 1);
            if token.whitespace || !contiguous {
                text.push(' ');
            }
        }
        text.trim().to_string()
    }
}

/// Pluggable syntactic parser.
pub trait SyntaxParser: Send + Sync {
    /// Parse one sentence into a dependency tree.
    fn parse(&self, text: &str) -> ParseTree;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str, whitespace: bool, dep: Dep, head: usize) -> Token {
        Token {
            text: text.to_string(),
            whitespace,
            lemma: text.to_lowercase(),
            pos: Pos::X,
            dep,
            head,
        }
    }

    #[test]
    fn subtree_text_preserves_spacing() {
        // "Paris, France" hanging off "in"
        let tree = ParseTree::new(vec![
            token("in", true, Dep::Root, 0),
            token("Paris", false, Dep::Pobj, 0),
            token(",", true, Dep::Punct, 1),
            token("France", false, Dep::Conj, 1),
        ]);
        assert_eq!(tree.subtree_text(0), "in Paris, France");
        assert_eq!(tree.subtree_text(1), "Paris, France");
        assert_eq!(tree.root(), Some(0));
        assert_eq!(tree.children(0).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn gaps_in_subtree_get_a_space() {
        let tree = ParseTree::new(vec![
            token("a", false, Dep::Root, 0),
            token("b", false, Dep::Dep, 0),
            token("c", false, Dep::Dep, 0),
            token("d", false, Dep::Dep, 2),
        ]);
        assert_eq!(tree.subtree_text(2), "cd");
        let tree = ParseTree::new(vec![
            token("x", false, Dep::Dep, 2),
            token("y", false, Dep::Root, 1),
            token("z", false, Dep::Dep, 1),
        ]);
        assert_eq!(tree.subtree_text(2), "x z");
    }
}
