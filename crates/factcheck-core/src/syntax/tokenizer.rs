//! Word tokenizer for the shallow parser.
//!
//! Splits on whitespace, then peels leading/trailing punctuation and English
//! contraction suffixes off each chunk. Every token remembers whether it was
//! followed by whitespace so subtrees can be rendered in their original form.

use super::lexicon::ABBREVIATIONS;

/// A token before tagging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    pub text: String,
    pub whitespace: bool,
}

impl RawToken {
    fn new(text: &str, whitespace: bool) -> Self {
        Self {
            text: text.to_string(),
            whitespace,
        }
    }
}

const CONTRACTION_SUFFIXES: &[&str] = &[
    "n't", "n’t", "'s", "’s", "'re", "’re", "'ve", "’ve", "'ll", "’ll", "'d", "’d", "'m", "’m",
];

fn is_leading_punct(c: char) -> bool {
    matches!(
        c,
        '(' | '[' | '{' | '"' | '\'' | '“' | '‘' | '«' | '₹' | '$' | '€' | '£' | '¥'
    )
}

fn is_trailing_punct(c: char) -> bool {
    matches!(
        c,
        '.' | ',' | ';' | ':' | '!' | '?' | ')' | ']' | '}' | '"' | '\'' | '”' | '’' | '»' | '…'
    )
}

/// Whether a chunk ending in `.` keeps its period (abbreviations, initials).
pub fn is_abbreviation(chunk: &str) -> bool {
    let lower = chunk.to_lowercase();
    if ABBREVIATIONS.contains(lower.as_str()) {
        return true;
    }
    // Single initial ("J.") or dotted acronym ("U.S.A.")
    let letters: Vec<&str> = lower.trim_end_matches('.').split('.').collect();
    lower.ends_with('.')
        && letters
            .iter()
            .all(|part| part.chars().count() == 1 && part.chars().all(char::is_alphabetic))
}

/// Tokenize `text` into words and punctuation.
pub fn tokenize(text: &str) -> Vec<RawToken> {
    let mut tokens = Vec::new();
    let mut chunks = text.split_whitespace().peekable();

    while let Some(chunk) = chunks.next() {
        let followed_by_space = chunks.peek().is_some();
        let start = tokens.len();
        split_chunk(chunk, &mut tokens);
        if tokens.len() > start {
            if let Some(last) = tokens.last_mut() {
                last.whitespace = followed_by_space;
            }
        }
    }

    tokens
}

fn split_chunk(chunk: &str, out: &mut Vec<RawToken>) {
    let mut core = chunk;

    // Leading punctuation and currency symbols
    while let Some(c) = core.chars().next() {
        if is_leading_punct(c) && core.chars().count() > 1 {
            out.push(RawToken::new(&core[..c.len_utf8()], false));
            core = &core[c.len_utf8()..];
        } else {
            break;
        }
    }

    // Trailing punctuation, kept in order
    let mut trailing: Vec<&str> = Vec::new();
    while let Some(c) = core.chars().last() {
        if !is_trailing_punct(c) || core.chars().count() == 1 {
            break;
        }
        if c == '.' && is_abbreviation(core) {
            break;
        }
        let cut = core.len() - c.len_utf8();
        trailing.push(&core[cut..]);
        core = &core[..cut];
    }

    split_contraction(core, out);

    for punct in trailing.into_iter().rev() {
        out.push(RawToken::new(punct, false));
    }
}

fn split_contraction(word: &str, out: &mut Vec<RawToken>) {
    let lower = word.to_lowercase();
    for suffix in CONTRACTION_SUFFIXES {
        if lower.ends_with(suffix) && lower.len() > suffix.len() {
            let cut = word.len() - suffix.len();
            if word.is_char_boundary(cut) {
                out.push(RawToken::new(&word[..cut], false));
                out.push(RawToken::new(&word[cut..], false));
                return;
            }
        }
    }
    if !word.is_empty() {
        out.push(RawToken::new(word, false));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(input: &str) -> Vec<String> {
        tokenize(input).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn splits_trailing_punctuation() {
        assert_eq!(
            texts("The tower is tall."),
            vec!["The", "tower", "is", "tall", "."]
        );
    }

    #[test]
    fn keeps_abbreviations_and_numbers_intact() {
        assert_eq!(
            texts("Dr. Rao paid Rs. 2,005.50 in the U.S."),
            vec!["Dr.", "Rao", "paid", "Rs.", "2,005.50", "in", "the", "U.S."]
        );
    }

    #[test]
    fn splits_currency_symbol() {
        assert_eq!(texts("₹2,005 crore"), vec!["₹", "2,005", "crore"]);
    }

    #[test]
    fn splits_contractions() {
        assert_eq!(
            texts("It doesn't matter, it's fine"),
            vec!["It", "does", "n't", "matter", ",", "it", "'s", "fine"]
        );
    }

    #[test]
    fn records_whitespace() {
        let tokens = tokenize("(Hello) world");
        assert!(!tokens[0].whitespace);
        assert!(!tokens[1].whitespace);
        assert!(tokens[2].whitespace);
        assert!(!tokens[3].whitespace);
    }

    #[test]
    fn initials_are_abbreviations() {
        assert!(is_abbreviation("J."));
        assert!(is_abbreviation("U.S.A."));
        assert!(!is_abbreviation("Paris."));
    }
}
