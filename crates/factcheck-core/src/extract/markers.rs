//! Discourse-marker stripping ("for example", "e.g.", "I think that" ...).

use lazy_static::lazy_static;
use regex::Regex;

const MARKER: &str = r"(?:for\s+example\b|e\.g\.|e\.g\b|i\.e\.|i\.e\b|i\s+think\s+that\b|it\s+is\s+believed\s+that\b)";

lazy_static! {
    /// A marker at the very start, optionally bracketed, with trailing punctuation.
    static ref LEADING: Regex = Regex::new(&format!(
        r"(?i)^\s*[\(\[\{{]?\s*{MARKER}\s*[\)\]\}}]?\s*[,:;\-–—]?\s*"
    ))
    .expect("leading marker pattern");

    /// A fully bracketed marker anywhere: "(e.g.)", "[for example]".
    static ref BRACKETED: Regex = Regex::new(&format!(
        r"(?i)\s*[\(\[\{{]\s*{MARKER}\s*[,:;]?\s*[\)\]\}}]"
    ))
    .expect("bracketed marker pattern");

    /// An opening bracket followed by a marker: "(i.e., Paris)" -> "(Paris)".
    static ref OPENING: Regex = Regex::new(&format!(
        r"(?i)([\(\[\{{])\s*{MARKER}\s*[,:;]?\s*"
    ))
    .expect("opening marker pattern");
}

/// Remove leading and bracketed discourse markers, then trim.
pub fn strip_markers(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = LEADING.replace(&current, "").into_owned();
        if next == current {
            break;
        }
        current = next;
    }
    let current = BRACKETED.replace_all(&current, "");
    let current = OPENING.replace_all(&current, "$1");
    current.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_markers() {
        assert_eq!(strip_markers("For example, the sky is blue."), "the sky is blue.");
        assert_eq!(strip_markers("e.g. water boils"), "water boils");
        assert_eq!(
            strip_markers("I think that it is believed that the moon is made of cheese"),
            "the moon is made of cheese"
        );
        assert_eq!(strip_markers("i.e.: prices rose"), "prices rose");
    }

    #[test]
    fn strips_bracketed_markers() {
        assert_eq!(strip_markers("(e.g.) Paris is big"), "Paris is big");
        assert_eq!(
            strip_markers("Cities [for example] grow fast"),
            "Cities grow fast"
        );
        assert_eq!(
            strip_markers("The capital (i.e., Paris) is big"),
            "The capital (Paris) is big"
        );
    }

    #[test]
    fn leaves_other_text_alone() {
        assert_eq!(strip_markers("  The exam is hard  "), "The exam is hard");
        assert_eq!(strip_markers("Forexample is one word"), "Forexample is one word");
        assert_eq!(strip_markers(""), "");
    }
}
