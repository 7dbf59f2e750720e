//! Sentence segmentation and declarative-sentence selection.

use crate::syntax::tokenizer::is_abbreviation;

const CLOSERS: &[char] = &['"', '\'', '”', '’', ')', ']', '}', '»'];

/// Split text into sentences on `.`, `!` and `?` followed by whitespace.
///
/// Abbreviations ("Dr.", "Rs.", "U.S.") and a lowercase continuation do not
/// end a sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut sentences = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for (i, word) in words.iter().enumerate() {
        current.push(word);
        let next = words.get(i + 1);
        if ends_sentence(word, next.copied()) {
            sentences.push(current.join(" "));
            current.clear();
        }
    }
    if !current.is_empty() {
        sentences.push(current.join(" "));
    }
    sentences
}

fn ends_sentence(word: &str, next: Option<&str>) -> bool {
    let core = word.trim_end_matches(CLOSERS);
    let Some(last) = core.chars().last() else {
        return false;
    };
    if !matches!(last, '.' | '!' | '?') {
        return false;
    }
    let Some(next) = next else {
        return true;
    };
    if last == '.' && is_abbreviation(core.trim_start_matches(['(', '[', '"', '“'])) {
        return false;
    }
    // "e.g. water" or "3. the" style continuations
    !next
        .trim_start_matches(['(', '[', '"', '“', '‘', '\''])
        .chars()
        .next()
        .is_some_and(char::is_lowercase)
}

/// Whether a sentence is declarative (does not end in `?` or `!`).
pub fn is_declarative(sentence: &str) -> bool {
    let core = sentence.trim_end().trim_end_matches(CLOSERS);
    !(core.ends_with('?') || core.ends_with('!'))
}

/// Longest declarative sentence by token count; ties go to the first.
pub fn longest_declarative(sentences: &[String]) -> Option<&str> {
    let mut best: Option<(&str, usize)> = None;
    for sentence in sentences.iter().filter(|s| is_declarative(s)) {
        let tokens = sentence.split_whitespace().count();
        if best.map_or(true, |(_, n)| tokens > n) {
            best = Some((sentence, tokens));
        }
    }
    best.map(|(s, _)| s)
}
