//! Surface normalization for deterministic claim/evidence matching.
//!
//! Two strings that state the same fact with different currency notation,
//! number formatting, abbreviations or entity spellings normalize to the same
//! text, so a whole-word substring test decides the match.

use lazy_static::lazy_static;
use phf::phf_map;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

const CURRENCY_SYMBOLS: &[char] = &['₹', '$', '€', '£', '¥'];

/// Abbreviated words and unit variants mapped to one canonical word.
static WORD_FORMS: phf::Map<&'static str, &'static str> = phf_map! {
    "dev" => "development",
    "govt" => "government",
    "dept" => "department",
    "intl" => "international",
    "natl" => "national",
    "ltd" => "limited",
    "corp" => "corporation",
    "cr" => "crore",
    "crores" => "crore",
    "lakhs" => "lakh",
    "lac" => "lakh",
    "lacs" => "lakh",
    "mn" => "million",
    "millions" => "million",
    "bn" => "billion",
    "billions" => "billion",
    "pc" => "percent",
};

lazy_static! {
    static ref CURRENCY_WORDS: Regex =
        Regex::new(r"\b(?:rs|inr|usd|eur|gbp)\b\.?").expect("currency word pattern");
    static ref THOUSANDS_SEPARATOR: Regex =
        Regex::new(r"(\d),(\d{2,3})\b").expect("thousands separator pattern");
    static ref POSSESSIVE: Regex = Regex::new(r"(\w)['’]s\b").expect("possessive pattern");
    static ref NON_ALPHANUMERIC: Regex =
        Regex::new(r"[^\p{L}\p{N}]+").expect("non-alphanumeric pattern");

    /// Known entity full forms collapsed to their acronym.
    static ref ENTITY_ALIASES: Vec<(Regex, &'static str)> = [
        (r"\bindian?s? renewable energy development agency(?: limited)?\b", "ireda"),
        (r"\bpress information bureau\b", "pib"),
        (r"\bindian space research organi[sz]ation\b", "isro"),
        (r"\breserve bank of india\b", "rbi"),
        (r"\bnational highways authority of india\b", "nhai"),
        (
            r"\b(?:ayushman bharat )?(?:pradhan mantri jan arogya yojana|pm jay)\b",
            "pmjay",
        ),
        (r"\bunited states(?: of america)?\b|\busa\b|\bu s a\b|\bu s\b", "us"),
        (r"\bunited kingdom\b|\bu k\b", "uk"),
        (r"\bgross domestic product\b", "gdp"),
    ]
    .into_iter()
    .map(|(pattern, acronym)| (Regex::new(pattern).expect("entity alias pattern"), acronym))
    .collect();
}

/// Normalize text for matching.
///
/// Steps, in order: NFKC + lowercase, `%` to "percent", currency symbols and
/// words removed, thousands separators removed, possessive `'s` dropped,
/// punctuation to spaces, word/unit variants canonicalized, entity full forms
/// collapsed to acronyms, whitespace collapsed.
pub fn normalize(text: &str) -> String {
    let mut s: String = text.nfkc().collect::<String>().to_lowercase();
    s = s.replace('%', " percent ");
    s = s.replace(CURRENCY_SYMBOLS, " ");
    s = CURRENCY_WORDS.replace_all(&s, " ").into_owned();

    // "1,00,000" needs more than one pass
    loop {
        let next = THOUSANDS_SEPARATOR.replace_all(&s, "$1$2").into_owned();
        if next == s {
            break;
        }
        s = next;
    }

    s = POSSESSIVE.replace_all(&s, "$1").into_owned();
    s = NON_ALPHANUMERIC.replace_all(&s, " ").into_owned();

    let mut s = s
        .split_whitespace()
        .map(|word| WORD_FORMS.get(word).copied().unwrap_or(word))
        .collect::<Vec<_>>()
        .join(" ");

    for (pattern, acronym) in ENTITY_ALIASES.iter() {
        s = pattern.replace_all(&s, *acronym).into_owned();
    }

    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Index of the first evidence item whose normalized text contains the
/// normalized claim on word boundaries. An empty normalized claim never
/// matches.
pub fn find_normalized_match<S: AsRef<str>>(claim: &str, evidence: &[S]) -> Option<usize> {
    let claim = normalize(claim);
    if claim.is_empty() {
        return None;
    }
    let needle = format!(" {claim} ");
    evidence
        .iter()
        .position(|item| format!(" {} ", normalize(item.as_ref())).contains(&needle))
}
