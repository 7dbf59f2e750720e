//! Rule-based verb lemmatizer backed by the verb lexicon.

use super::lexicon::{IRREGULAR_PARTICIPLES, IRREGULAR_VERBS, VERBS};

/// Inflectional shape of a verb token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbForm {
    Base,
    ThirdPerson,
    Past,
    Participle,
    Gerund,
}

/// Reduce an inflected verb to its lexicon lemma.
///
/// Returns `None` when no candidate is a known verb.
pub fn verb_lemma(lower: &str) -> Option<String> {
    if let Some(lemma) = IRREGULAR_VERBS.get(lower) {
        return Some((*lemma).to_string());
    }
    if VERBS.contains(lower) {
        return Some(lower.to_string());
    }
    candidates(lower)
        .into_iter()
        .find(|c| c.len() >= 3 && VERBS.contains(c.as_str()))
}

/// Best-effort lemma for verbs missing from the lexicon ("sanctioned").
pub fn guess_verb_lemma(lower: &str) -> String {
    if let Some(lemma) = verb_lemma(lower) {
        return lemma;
    }
    if let Some(stem) = lower.strip_suffix("ied") {
        return format!("{stem}y");
    }
    if let Some(stem) = lower.strip_suffix("ed") {
        if stem.len() >= 3 {
            return undouble(stem).unwrap_or_else(|| stem.to_string());
        }
    }
    if let Some(stem) = lower.strip_suffix("ing") {
        if stem.len() >= 3 {
            return undouble(stem).unwrap_or_else(|| stem.to_string());
        }
    }
    if let Some(stem) = lower.strip_suffix("ies") {
        return format!("{stem}y");
    }
    if let Some(stem) = lower.strip_suffix('s') {
        if stem.len() >= 3 && !stem.ends_with('s') {
            return stem.to_string();
        }
    }
    lower.to_string()
}

/// Classify the inflection of a verb surface form given its lemma.
pub fn verb_form(lower: &str, lemma: &str) -> VerbForm {
    if lower == lemma {
        return VerbForm::Base;
    }
    if IRREGULAR_PARTICIPLES.contains(lower) || (lower.ends_with("en") && lemma != lower) {
        return VerbForm::Participle;
    }
    if lower.ends_with("ing") {
        return VerbForm::Gerund;
    }
    if lower.ends_with("ed") {
        return VerbForm::Participle;
    }
    if lower.ends_with('s') {
        return VerbForm::ThirdPerson;
    }
    VerbForm::Past
}

fn undouble(stem: &str) -> Option<String> {
    let bytes = stem.as_bytes();
    let n = bytes.len();
    if n >= 2 && bytes[n - 1] == bytes[n - 2] && !matches!(bytes[n - 1], b'l' | b's' | b'z') {
        Some(stem[..n - 1].to_string())
    } else {
        None
    }
}

fn candidates(lower: &str) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(stem) = lower.strip_suffix("ies") {
        out.push(format!("{stem}y"));
    }
    if let Some(stem) = lower.strip_suffix("es") {
        out.push(stem.to_string());
    }
    if let Some(stem) = lower.strip_suffix('s') {
        out.push(stem.to_string());
    }
    if let Some(stem) = lower.strip_suffix("ied") {
        out.push(format!("{stem}y"));
    }
    if let Some(stem) = lower.strip_suffix("ed") {
        out.push(stem.to_string());
        out.push(format!("{stem}e"));
        if let Some(single) = undouble(stem) {
            out.push(single);
        }
    }
    if let Some(stem) = lower.strip_suffix('d') {
        out.push(stem.to_string());
    }
    if let Some(stem) = lower.strip_suffix("ing") {
        out.push(stem.to_string());
        out.push(format!("{stem}e"));
        if let Some(single) = undouble(stem) {
            out.push(single);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn irregular_forms() {
        assert_eq!(verb_lemma("was").as_deref(), Some("be"));
        assert_eq!(verb_lemma("built").as_deref(), Some("build"));
        assert_eq!(verb_lemma("n't"), None);
    }

    #[test]
    fn regular_inflections() {
        assert_eq!(verb_lemma("located").as_deref(), Some("locate"));
        assert_eq!(verb_lemma("launched").as_deref(), Some("launch"));
        assert_eq!(verb_lemma("drives").as_deref(), Some("drive"));
        assert_eq!(verb_lemma("stopped").as_deref(), Some("stop"));
        assert_eq!(verb_lemma("studies").as_deref(), Some("study"));
        assert_eq!(verb_lemma("provides").as_deref(), Some("provide"));
        assert_eq!(verb_lemma("running").as_deref(), Some("run"));
    }

    #[test]
    fn unknown_words_are_not_verbs() {
        assert_eq!(verb_lemma("tower"), None);
        assert_eq!(verb_lemma("paris"), None);
    }

    #[test]
    fn guesses_unknown_regular_verbs() {
        assert_eq!(guess_verb_lemma("sanctioned"), "sanction");
        assert_eq!(guess_verb_lemma("partnered"), "partner");
    }

    #[test]
    fn forms() {
        assert_eq!(verb_form("located", "locate"), VerbForm::Participle);
        assert_eq!(verb_form("built", "build"), VerbForm::Participle);
        assert_eq!(verb_form("drives", "drive"), VerbForm::ThirdPerson);
        assert_eq!(verb_form("launch", "launch"), VerbForm::Base);
        assert_eq!(verb_form("went", "go"), VerbForm::Past);
    }
}
