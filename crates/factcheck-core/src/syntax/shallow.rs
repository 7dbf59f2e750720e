//! Deterministic rule-based dependency parser.
//!
//! Three passes over one sentence:
//! 1. tokenize and tag with the phf lexicon plus contextual rules,
//! 2. group auxiliaries, negations and the main verb into verb groups,
//! 3. pick the main-clause verb group as root and hang noun phrases,
//!    prepositional phrases and embedded clauses off it as contiguous spans.
//!
//! Every span is attached to a single local head, so `subtree_text` of any
//! dependent reproduces the original phrase.

use super::lemma::{guess_verb_lemma, verb_form, verb_lemma, VerbForm};
use super::lexicon::{
    ADJECTIVES, ADVERBS, BE_FORMS, CLAUSAL_PREPOSITIONS, COORDINATORS, COPULAR_LEMMAS, DETERMINERS, DO_FORMS,
    HAVE_FORMS, IRREGULAR_PARTICIPLES, IRREGULAR_VERBS, LINKING_LEMMAS, MODALS, NEGATIONS,
    POSSESSIVES, PREPOSITIONS, PRONOUNS, RELATIVES, SUBORDINATORS, TEMPORAL_MODIFIERS,
    TEMPORAL_WORDS, VERBS,
};
use super::tokenizer::{tokenize, RawToken};
use super::{Dep, ParseTree, Pos, SyntaxParser, Token};

/// Rule-based English parser producing ClearNLP-style dependency labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShallowParser;

impl ShallowParser {
    pub fn new() -> Self {
        Self
    }
}

impl SyntaxParser for ShallowParser {
    fn parse(&self, text: &str) -> ParseTree {
        let raw = tokenize(text);
        if raw.is_empty() {
            return ParseTree::default();
        }
        let tagged = tag(&raw);
        TreeBuilder::new(tagged).build()
    }
}

const LY_NOUNS: &[&str] = &[
    "family", "italy", "july", "assembly", "anomaly", "ally", "rally", "belly", "jelly", "bully",
    "lily", "monopoly", "fly", "reply", "supply", "apply",
];

const ADJECTIVE_SUFFIXES: &[&str] = &[
    "ous", "ful", "ive", "able", "ible", "ical", "less", "ish", "ional", "ial",
];

const CURRENCY_SYMBOLS: &[&str] = &["₹", "$", "€", "£", "¥"];

#[derive(Debug, Clone)]
struct Tagged {
    text: String,
    lower: String,
    whitespace: bool,
    pos: Pos,
    lemma: String,
    form: Option<VerbForm>,
}

impl Tagged {
    fn is(&self, pos: Pos) -> bool {
        self.pos == pos
    }

    fn is_verbal(&self) -> bool {
        matches!(self.pos, Pos::Aux | Pos::Verb)
    }

    fn is_negation(&self) -> bool {
        self.pos == Pos::Part && NEGATIONS.contains(self.lower.as_str())
    }

    fn is_infinitive_marker(&self) -> bool {
        self.pos == Pos::Part && self.lower == "to"
    }

    fn is_possessive_marker(&self) -> bool {
        self.pos == Pos::Part && (self.lower == "'s" || self.lower == "’s")
    }

    fn is_relative(&self) -> bool {
        self.pos == Pos::Pron && (RELATIVES.contains(self.lower.as_str()) || self.lower == "that")
    }

    fn is_clause_punct(&self) -> bool {
        self.pos == Pos::Punct && matches!(self.lower.as_str(), "," | ";" | ":" | "-" | "–" | "—")
    }
}

fn is_punctuation(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_punctuation() || matches!(c, '“' | '”' | '‘' | '’' | '–' | '—' | '…' | '«' | '»'))
}

fn is_capitalized(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_uppercase)
}

fn is_participle_like(lower: &str) -> bool {
    IRREGULAR_PARTICIPLES.contains(lower) || (lower.ends_with("ed") && lower.len() > 3)
}

fn is_base_verb(lower: &str) -> bool {
    VERBS.contains(lower)
}

/// First following word that is not an adverb or negation.
fn next_content<'a>(lowers: &'a [String], from: usize) -> Option<&'a str> {
    lowers[from..]
        .iter()
        .map(String::as_str)
        .find(|w| !ADVERBS.contains(*w) && !NEGATIONS.contains(*w))
}

fn tag(raw: &[RawToken]) -> Vec<Tagged> {
    let lowers: Vec<String> = raw.iter().map(|t| t.text.to_lowercase()).collect();
    let mut out: Vec<Tagged> = Vec::with_capacity(raw.len());
    // Clauses opened so far that have not seen their verb yet
    let mut verbs_owed: usize = 1;

    for (i, token) in raw.iter().enumerate() {
        let lower = lowers[i].as_str();
        let prev = out.last();
        let next = lowers.get(i + 1).map(String::as_str);
        let clause_has_verb = verbs_owed == 0;
        let (pos, lemma) = classify(i, &token.text, lower, prev, next, &lowers, clause_has_verb);
        let continues_group = prev.is_some_and(|p| p.is(Pos::Aux) || p.is_negation());

        let form = if matches!(pos, Pos::Verb | Pos::Aux) {
            Some(verb_form(lower, &lemma))
        } else {
            None
        };

        match pos {
            Pos::Verb | Pos::Aux if !continues_group => verbs_owed = verbs_owed.saturating_sub(1),
            Pos::Sconj => verbs_owed += 1,
            Pos::Pron if RELATIVES.contains(lower) || lower == "that" => verbs_owed += 1,
            Pos::Punct | Pos::Cconj => verbs_owed = verbs_owed.max(1),
            _ => {}
        }

        out.push(Tagged {
            text: token.text.clone(),
            lower: lower.to_string(),
            whitespace: token.whitespace,
            pos,
            lemma,
            form,
        });
    }

    out
}

fn classify(
    i: usize,
    text: &str,
    lower: &str,
    prev: Option<&Tagged>,
    next: Option<&str>,
    lowers: &[String],
    clause_has_verb: bool,
) -> (Pos, String) {
    let owned = |s: &str| s.to_string();

    if CURRENCY_SYMBOLS.contains(&lower) {
        return (Pos::Sym, owned(lower));
    }
    if is_punctuation(text) {
        return (Pos::Punct, owned(lower));
    }
    if lower.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return (Pos::Num, owned(lower));
    }
    if NEGATIONS.contains(lower) {
        let lemma = if lower.starts_with('n') && lower.len() == 3 { "not" } else { lower };
        return (Pos::Part, owned(lemma));
    }
    if lower == "'s" || lower == "’s" {
        let after_pronoun = prev.is_some_and(|p| {
            matches!(
                p.lower.as_str(),
                "it" | "he" | "she" | "that" | "what" | "there" | "who" | "here" | "this"
            )
        });
        return if after_pronoun {
            (Pos::Aux, owned("be"))
        } else {
            (Pos::Part, owned(lower))
        };
    }
    if lower == "to" {
        let infinitive = next.is_some_and(|n| is_base_verb(n) && !ADJECTIVES.contains(n));
        return if infinitive {
            (Pos::Part, owned("to"))
        } else {
            (Pos::Adp, owned("to"))
        };
    }
    if BE_FORMS.contains(lower) {
        return (Pos::Aux, owned("be"));
    }
    if HAVE_FORMS.contains(lower) {
        let perfect = next_content(lowers, i + 1).is_some_and(is_participle_like);
        return (if perfect { Pos::Aux } else { Pos::Verb }, owned("have"));
    }
    if DO_FORMS.contains(lower) {
        let support = next_content(lowers, i + 1).is_some_and(is_base_verb);
        return (if support { Pos::Aux } else { Pos::Verb }, owned("do"));
    }
    if MODALS.contains(lower) {
        let lemma = IRREGULAR_VERBS.get(lower).copied().unwrap_or(lower);
        return (Pos::Aux, owned(lemma));
    }
    if lower == "there" {
        let expletive = next.is_some_and(|n| BE_FORMS.contains(n) || n == "'s");
        return (if expletive { Pos::Pron } else { Pos::Adv }, owned(lower));
    }
    if lower == "that" {
        return match prev.map(|p| p.pos) {
            Some(Pos::Noun | Pos::Propn | Pos::Pron) => (Pos::Pron, owned(lower)),
            Some(Pos::Verb | Pos::Aux) => (Pos::Sconj, owned(lower)),
            _ => (Pos::Det, owned(lower)),
        };
    }
    if RELATIVES.contains(lower) {
        return (Pos::Pron, owned(lower));
    }
    if DETERMINERS.contains(lower) {
        return (Pos::Det, owned(lower));
    }
    if POSSESSIVES.contains(lower) || PRONOUNS.contains(lower) {
        return (Pos::Pron, owned(lower));
    }
    if COORDINATORS.contains(lower) {
        return (Pos::Cconj, owned(lower));
    }
    if SUBORDINATORS.contains(lower) {
        return (Pos::Sconj, owned(lower));
    }
    if PREPOSITIONS.contains(lower) {
        return (Pos::Adp, owned(lower));
    }
    if ADVERBS.contains(lower) {
        return (Pos::Adv, owned(lower));
    }

    if let Some(verb) = verb_candidate(text, lower, prev, next, clause_has_verb) {
        return (Pos::Verb, verb);
    }

    if ADJECTIVES.contains(lower) {
        return (Pos::Adj, owned(lower));
    }
    if !is_capitalized(text) {
        if lower.len() > 4 && lower.ends_with("ly") && !LY_NOUNS.contains(&lower) {
            return (Pos::Adv, owned(lower));
        }
        if lower.len() > 5 && ADJECTIVE_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
            return (Pos::Adj, owned(lower));
        }
        return (Pos::Noun, owned(lower));
    }
    (Pos::Propn, owned(lower))
}

/// Decide whether an open-class word is acting as a verb here.
fn verb_candidate(
    text: &str,
    lower: &str,
    prev: Option<&Tagged>,
    next: Option<&str>,
    clause_has_verb: bool,
) -> Option<String> {
    let known = verb_lemma(lower);
    let unknown_regular = known.is_none()
        && !is_capitalized(text)
        && lower.len() > 4
        && lower.ends_with("ed");
    if known.is_none() && !unknown_regular {
        return None;
    }
    if is_capitalized(text) {
        return None;
    }

    let lemma = known.unwrap_or_else(|| guess_verb_lemma(lower));
    let form = verb_form(lower, &lemma);
    let inflected_for_clause = matches!(form, VerbForm::Participle | VerbForm::Past | VerbForm::Gerund);

    let Some(prev) = prev else {
        // Sentence-initial lowercase word followed by an auxiliary is a noun
        return match next {
            Some(n) if is_auxiliary_word(n) => None,
            _ => Some(lemma),
        };
    };

    let verbal = match prev.pos {
        Pos::Det | Pos::Adj | Pos::Num | Pos::Sym => false,
        Pos::Part if prev.is_possessive_marker() => false,
        Pos::Pron if POSSESSIVES.contains(prev.lower.as_str()) => false,
        Pos::Aux => true,
        Pos::Part => true,
        Pos::Adp => form == VerbForm::Gerund,
        Pos::Adv => !clause_has_verb || inflected_for_clause,
        Pos::Noun | Pos::Propn => {
            if next.is_some_and(is_auxiliary_word) {
                false
            } else {
                !clause_has_verb || inflected_for_clause
            }
        }
        Pos::Pron => !clause_has_verb || inflected_for_clause,
        Pos::Punct | Pos::Cconj | Pos::Sconj => {
            !next.is_some_and(|n| is_auxiliary_word(n) || looks_finite(n))
        }
        _ => !clause_has_verb,
    };

    verbal.then_some(lemma)
}

/// Past-tense or participle shape of a known verb ("fell", "rose", "launched").
fn looks_finite(lower: &str) -> bool {
    match IRREGULAR_VERBS.get(lower) {
        Some(lemma) => *lemma != lower,
        None => lower.ends_with("ed") && verb_lemma(lower).is_some(),
    }
}

fn is_auxiliary_word(lower: &str) -> bool {
    BE_FORMS.contains(lower) || HAVE_FORMS.contains(lower) || MODALS.contains(lower)
        || DO_FORMS.contains(lower)
}

/// A contiguous run of auxiliaries, negations and at most one main verb.
#[derive(Debug, Clone, Copy)]
struct VerbGroup {
    start: usize,
    end: usize,
    head: usize,
}

struct TreeBuilder {
    tags: Vec<Tagged>,
    heads: Vec<Option<usize>>,
    deps: Vec<Dep>,
}

impl TreeBuilder {
    fn new(tags: Vec<Tagged>) -> Self {
        let n = tags.len();
        Self {
            tags,
            heads: vec![None; n],
            deps: vec![Dep::Dep; n],
        }
    }

    fn len(&self) -> usize {
        self.tags.len()
    }

    fn set(&mut self, index: usize, head: usize, dep: Dep) {
        self.heads[index] = Some(head);
        self.deps[index] = dep;
    }

    fn build(mut self) -> ParseTree {
        let groups = self.verb_groups();
        let root = match self.main_group(&groups) {
            Some(main) => {
                self.attach_verb_group(main);
                let root = main.head;
                self.attach_left(main, root, &groups);
                self.attach_right(main.end, root);
                root
            }
            None => self.attach_verbless(),
        };

        let n = self.len();
        for i in 0..n {
            if self.heads[i].is_none() {
                self.set(i, root, if self.tags[i].is(Pos::Punct) { Dep::Punct } else { Dep::Dep });
            }
        }

        let tokens = self
            .tags
            .into_iter()
            .zip(self.heads)
            .zip(self.deps)
            .map(|((tag, head), dep)| Token {
                text: tag.text,
                whitespace: tag.whitespace,
                lemma: tag.lemma,
                pos: tag.pos,
                dep,
                head: head.unwrap_or(root),
            })
            .collect();
        ParseTree::new(tokens)
    }

    // ---- verb groups -------------------------------------------------

    fn verb_groups(&self) -> Vec<VerbGroup> {
        self.groups_in(0, self.len())
    }

    fn groups_in(&self, from: usize, to: usize) -> Vec<VerbGroup> {
        let mut groups = Vec::new();
        let mut i = from;
        while i < to {
            let t = &self.tags[i];
            let starts = t.is_verbal() || (t.is_negation() && self.next_is_verbal(i + 1, to));
            if !starts {
                i += 1;
                continue;
            }
            let start = i;
            let mut last_aux = None;
            let mut verb = None;
            while i < to {
                let t = &self.tags[i];
                match t.pos {
                    Pos::Aux => {
                        last_aux = Some(i);
                        i += 1;
                    }
                    Pos::Verb => {
                        verb = Some(i);
                        i += 1;
                        break;
                    }
                    Pos::Part if t.is_negation() => i += 1,
                    Pos::Adv if self.next_is_verbal(i + 1, to) => i += 1,
                    _ => break,
                }
            }
            if let Some(head) = verb.or(last_aux) {
                groups.push(VerbGroup { start, end: i, head });
            }
        }
        groups
    }

    fn next_is_verbal(&self, mut i: usize, to: usize) -> bool {
        while i < to {
            let t = &self.tags[i];
            if t.is_verbal() {
                return true;
            }
            if !(t.is(Pos::Adv) || t.is_negation()) {
                return false;
            }
            i += 1;
        }
        false
    }

    /// The first verb group not inside a subordinate, relative, infinitival
    /// or prepositional context; falls back to the first usable group.
    fn main_group(&self, groups: &[VerbGroup]) -> Option<VerbGroup> {
        let mut subordinate_open = false;
        let mut g = 0;
        let mut i = 0;
        while i < self.len() {
            if g < groups.len() && groups[g].start == i {
                let group = groups[g];
                if !subordinate_open && !self.is_nonfinite(group) {
                    // "X, built in 1932, collapsed": resume at the closing comma
                    if let Some(close) = self.appositive_close(group, groups) {
                        while g < groups.len() && groups[g].start < close {
                            g += 1;
                        }
                        i = close;
                        continue;
                    }
                    return Some(group);
                }
                subordinate_open = false;
                i = group.end;
                g += 1;
                continue;
            }
            let t = &self.tags[i];
            if t.is(Pos::Sconj)
                || t.is_relative()
                || (t.is(Pos::Adp) && CLAUSAL_PREPOSITIONS.contains(t.lower.as_str()))
            {
                subordinate_open = true;
            }
            i += 1;
        }
        groups
            .iter()
            .copied()
            .find(|group| {
                !self.is_nonfinite(*group) && self.appositive_close(*group, groups).is_none()
            })
            .or_else(|| groups.first().copied())
    }

    /// Bare participle group set off from a preceding noun phrase by a comma;
    /// returns where that noun phrase starts.
    fn participle_after_np(&self, group: VerbGroup) -> Option<usize> {
        let head = &self.tags[group.head];
        let participial = group.head == group.start
            && head.is(Pos::Verb)
            && matches!(head.form, Some(VerbForm::Participle | VerbForm::Past));
        if !participial || group.start < 2 || self.tags[group.start - 1].lower != "," {
            return None;
        }
        let comma = group.start - 1;
        let np_start = (0..comma)
            .rev()
            .find(|&k| self.tags[k].is_clause_punct())
            .map_or(0, |k| k + 1);
        (np_start < comma && self.np_end(np_start, comma) == comma).then_some(np_start)
    }

    /// Closing comma of a participial modifier that sits between a subject
    /// and the finite verb group right after it.
    fn appositive_close(&self, group: VerbGroup, groups: &[VerbGroup]) -> Option<usize> {
        self.participle_after_np(group)?;
        let close = (group.end..self.len()).find(|&k| self.tags[k].is_clause_punct())?;
        if self.tags[close].lower != "," {
            return None;
        }
        let next = groups.iter().find(|g| g.start > close)?;
        let adjacent = (close + 1..next.start).all(|k| self.tags[k].is(Pos::Adv));
        (adjacent && !self.is_nonfinite(*next)).then_some(close)
    }

    fn is_nonfinite(&self, group: VerbGroup) -> bool {
        if group.start == 0 {
            return false;
        }
        let before = &self.tags[group.start - 1];
        before.is_infinitive_marker() || before.is(Pos::Adp)
    }

    fn attach_verb_group(&mut self, group: VerbGroup) {
        let head = group.head;
        self.set(head, head, Dep::Root);
        let passive_head = self.tags[head].is(Pos::Verb)
            && matches!(self.tags[head].form, Some(VerbForm::Participle));
        let last_aux = (group.start..head).rev().find(|&k| self.tags[k].is(Pos::Aux));
        for k in group.start..group.end {
            if k == head {
                continue;
            }
            let dep = match self.tags[k].pos {
                Pos::Aux if passive_head && Some(k) == last_aux && self.tags[k].lemma == "be" => {
                    Dep::Auxpass
                }
                Pos::Aux => Dep::Aux,
                Pos::Part => Dep::Neg,
                Pos::Adv => Dep::Advmod,
                _ => Dep::Dep,
            };
            self.set(k, head, dep);
        }
    }

    fn is_passive(&self, root: usize) -> bool {
        (0..self.len()).any(|k| self.heads[k] == Some(root) && self.deps[k] == Dep::Auxpass)
    }

    // ---- left of the predicate ---------------------------------------

    fn attach_left(&mut self, main: VerbGroup, root: usize, groups: &[VerbGroup]) {
        let mut end = main.start;
        while end > 0 && self.tags[end - 1].is_clause_punct() {
            end -= 1;
            self.set(end, root, Dep::Punct);
        }
        if end == 0 {
            return;
        }
        if end < main.start && self.attach_modified_subject(end, root, groups) {
            return;
        }

        let span_start = self.subject_segment_start(end);
        let first = &self.tags[span_start];

        let subject_start = if first.is(Pos::Sconj)
            || (first.is(Pos::Adp) && !first.is_relative())
        {
            self.backward_np_start(end, span_start)
        } else {
            span_start
        };

        if subject_start > 0 {
            self.attach_fronted(0, subject_start, root, groups);
        }
        if subject_start >= end {
            return;
        }

        let first = &self.tags[subject_start];
        if first.lower == "there" && first.is(Pos::Pron) {
            self.set(subject_start, root, Dep::Expl);
            if subject_start + 1 < end {
                self.attach_span(subject_start + 1, end, root, Dep::Dep);
            }
            return;
        }
        if first.is_relative() || first.is(Pos::Sconj) {
            self.attach_span(subject_start, end, root, Dep::Csubj);
            return;
        }

        let np_end = self.np_end(subject_start, end);
        if np_end == subject_start {
            self.attach_span(subject_start, end, root, Dep::Dep);
            return;
        }
        let head = self.np_head(subject_start, np_end);
        let dep = if self.is_passive(root) {
            Dep::Nsubjpass
        } else {
            Dep::Nsubj
        };
        self.set(head, root, dep);
        self.attach_np_internals(subject_start, np_end, head);
        self.attach_tail(np_end, end, head);
    }

    /// Subject noun phrase followed by a comma-fenced participial modifier
    /// ending at `end`. The modifier hangs off the subject head as `acl`.
    fn attach_modified_subject(&mut self, end: usize, root: usize, groups: &[VerbGroup]) -> bool {
        let Some(participle) = (0..end)
            .rev()
            .find(|&k| self.tags[k].is_clause_punct())
            .map(|k| k + 1)
        else {
            return false;
        };
        let Some(group) = groups.iter().copied().find(|g| g.start == participle) else {
            return false;
        };
        let Some(np_start) = self.participle_after_np(group) else {
            return false;
        };

        if np_start > 0 {
            self.attach_fronted(0, np_start, root, groups);
        }
        let comma = participle - 1;
        let head = self.np_head(np_start, comma);
        let dep = if self.is_passive(root) {
            Dep::Nsubjpass
        } else {
            Dep::Nsubj
        };
        self.set(head, root, dep);
        self.attach_np_internals(np_start, comma, head);
        self.set(comma, head, Dep::Punct);
        self.attach_span(participle, end, head, Dep::Acl);
        true
    }

    /// Start of the comma-delimited segment that holds the subject.
    fn subject_segment_start(&self, end: usize) -> usize {
        let mut segments: Vec<(usize, usize)> = Vec::new();
        let mut seg_start = 0;
        for k in 0..end {
            if self.tags[k].is_clause_punct() {
                if seg_start < k {
                    segments.push((seg_start, k));
                }
                seg_start = k + 1;
            }
        }
        if seg_start < end {
            segments.push((seg_start, end));
        }

        for s in (0..segments.len()).rev() {
            let (a, b) = segments[s];
            if self.tags[a].is_relative() && s > 0 {
                continue;
            }
            let has_nominal = (a..b).any(|k| self.tags[k].pos.is_nominal());
            if has_nominal || self.tags[a].is_relative() {
                // merge any trailing relative-clause segments into the span
                return a;
            }
        }
        segments.last().map(|s| s.0).unwrap_or(0)
    }

    /// Scan back from the predicate over noun-phrase material.
    fn backward_np_start(&self, end: usize, floor: usize) -> usize {
        let mut k = end;
        while k > floor {
            let t = &self.tags[k - 1];
            match t.pos {
                Pos::Noun | Pos::Propn | Pos::Num | Pos::Adj | Pos::Sym => k -= 1,
                Pos::Part if t.is_possessive_marker() => k -= 1,
                Pos::Det => {
                    k -= 1;
                    break;
                }
                Pos::Pron if POSSESSIVES.contains(t.lower.as_str()) => {
                    k -= 1;
                    break;
                }
                Pos::Pron if k == end => {
                    k -= 1;
                    break;
                }
                _ => break,
            }
        }
        k
    }

    fn attach_fronted(&mut self, from: usize, to: usize, root: usize, groups: &[VerbGroup]) {
        let mut k = from;
        while k < to {
            if self.tags[k].is(Pos::Punct) {
                self.set(k, root, Dep::Punct);
                k += 1;
                continue;
            }
            let seg_end = (k..to)
                .find(|&j| self.tags[j].is_clause_punct())
                .unwrap_or(to);
            let has_group = groups.iter().any(|g| g.start >= k && g.start < seg_end);
            let first = &self.tags[k];
            let dep = match first.pos {
                Pos::Sconj => Dep::Advcl,
                Pos::Adp if has_group && CLAUSAL_PREPOSITIONS.contains(first.lower.as_str()) => {
                    Dep::Advcl
                }
                Pos::Adp => Dep::Prep,
                Pos::Adv => Dep::Advmod,
                _ if self.is_temporal_np(k, seg_end) => Dep::Npadvmod,
                _ => Dep::Dep,
            };
            if dep == Dep::Prep {
                self.attach_pp(k, seg_end, root);
            } else {
                self.attach_span(k, seg_end, root, dep);
            }
            k = seg_end;
        }
    }

    // ---- right of the predicate --------------------------------------

    fn attach_right(&mut self, from: usize, root: usize) {
        let n = self.len();
        let clause_end = self.clause_end(from);
        self.attach_complements(from, clause_end, root);

        // Coordinated clause: cc + conj, everything else punctuation
        let mut k = clause_end;
        let mut tail_end = n;
        while tail_end > k && self.tags[tail_end - 1].is(Pos::Punct) {
            tail_end -= 1;
            self.set(tail_end, root, Dep::Punct);
        }
        while k < tail_end && (self.tags[k].is(Pos::Punct) || self.tags[k].is(Pos::Cconj)) {
            let dep = if self.tags[k].is(Pos::Cconj) { Dep::Cc } else { Dep::Punct };
            self.set(k, root, dep);
            k += 1;
        }
        if k < tail_end {
            self.attach_span(k, tail_end, root, Dep::Conj);
        }
    }

    /// End of the main clause: a semicolon or a coordinator opening a new clause.
    fn clause_end(&self, from: usize) -> usize {
        let n = self.len();
        for q in from..n {
            let t = &self.tags[q];
            if t.is(Pos::Punct) && t.lower == ";" {
                return q;
            }
            if t.is(Pos::Cconj) && self.opens_clause(q + 1) {
                // Keep a preceding comma with the coordinated clause
                return if q > from && self.tags[q - 1].lower == "," { q - 1 } else { q };
            }
        }
        n
    }

    fn opens_clause(&self, mut k: usize) -> bool {
        let n = self.len();
        while k < n && (self.tags[k].is(Pos::Adv) || self.tags[k].is_negation()) {
            k += 1;
        }
        if k >= n {
            return false;
        }
        if self.tags[k].is_verbal() {
            return true;
        }
        let np_end = self.np_end(k, n);
        np_end > k && np_end < n && self.tags[np_end].is_verbal()
    }

    fn attach_complements(&mut self, from: usize, to: usize, root: usize) {
        let root_lemma = self.tags[root].lemma.clone();
        let linking = LINKING_LEMMAS.contains(root_lemma.as_str());
        let copular = self.tags[root].is(Pos::Aux) || COPULAR_LEMMAS.contains(root_lemma.as_str());
        // Heads of the last complement noun phrase and the last prepositional object
        let mut last_np: Option<usize> = None;
        let mut last_pobj: Option<usize> = None;
        let mut objects = 0;
        let mut p = from;

        while p < to {
            let t = self.tags[p].clone();
            match t.pos {
                Pos::Punct => {
                    if t.lower == "," && p + 1 < to {
                        if let Some(np) = last_pobj.or(last_np) {
                            let next = &self.tags[p + 1];
                            if next.is_relative() {
                                let end = self.next_clause_punct(p + 2, to);
                                self.set(p, np, Dep::Punct);
                                self.attach_span(p + 1, end, np, Dep::Relcl);
                                p = end;
                                continue;
                            }
                            if next.is(Pos::Propn) && self.tags[np].is(Pos::Propn) {
                                let end = self.np_end(p + 1, to);
                                self.set(p, np, Dep::Punct);
                                let head = self.np_head(p + 1, end);
                                self.set(head, np, Dep::Conj);
                                self.attach_np_internals(p + 1, end, head);
                                p = end;
                                continue;
                            }
                        }
                    }
                    self.set(p, root, Dep::Punct);
                    last_np = None;
                    last_pobj = None;
                    p += 1;
                }
                Pos::Adp => {
                    let clausal = CLAUSAL_PREPOSITIONS.contains(t.lower.as_str())
                        && self.clause_follows(p + 1, to);
                    if clausal {
                        let end = self.next_clause_punct(p + 1, to);
                        self.attach_span(p, end, root, Dep::Advcl);
                        p = end;
                        last_np = None;
                        last_pobj = None;
                    } else {
                        let end = self.pp_end(p, to);
                        let parent = if t.lower == "of" {
                            last_pobj.or(last_np)
                        } else {
                            last_np
                        };
                        last_pobj = self.attach_pp(p, end, parent.unwrap_or(root));
                        p = end;
                    }
                }
                Pos::Part if t.is_infinitive_marker() => {
                    let end = self.next_clause_punct(p + 1, to);
                    self.attach_span(p, end, root, Dep::Xcomp);
                    p = end;
                    last_np = None;
                }
                Pos::Sconj => {
                    let end = self.next_clause_punct(p + 1, to);
                    let dep = if t.lower == "that" { Dep::Ccomp } else { Dep::Advcl };
                    self.attach_span(p, end, root, dep);
                    p = end;
                    last_np = None;
                }
                Pos::Pron if t.is_relative() => {
                    let end = self.next_clause_punct(p + 1, to);
                    match last_pobj.or(last_np) {
                        Some(np) => self.attach_span(p, end, np, Dep::Relcl),
                        None => self.attach_span(p, end, root, Dep::Ccomp),
                    };
                    p = end;
                }
                Pos::Adv if !(p + 1 < to && self.tags[p + 1].is(Pos::Adj)) => {
                    self.set(p, root, Dep::Advmod);
                    p += 1;
                }
                Pos::Aux | Pos::Verb => {
                    let end = self.next_clause_punct(p, to);
                    match last_pobj.or(last_np) {
                        Some(np) => self.attach_span(p, end, np, Dep::Relcl),
                        None => self.attach_span(p, end, root, Dep::Ccomp),
                    };
                    p = end;
                    last_np = None;
                    last_pobj = None;
                }
                Pos::Cconj => {
                    self.set(p, last_np.unwrap_or(root), Dep::Cc);
                    p += 1;
                }
                Pos::Adv | Pos::Adj if !self.adjective_opens_np(p, to) => {
                    let end = self.adjp_end(p, to);
                    let head = (p..end)
                        .rev()
                        .find(|&k| self.tags[k].is(Pos::Adj))
                        .unwrap_or(p);
                    let dep = if linking { Dep::Acomp } else { Dep::Oprd };
                    self.set(head, root, dep);
                    for k in p..end {
                        if k != head {
                            let local = if self.tags[k].is(Pos::Cconj) { Dep::Cc } else { Dep::Advmod };
                            self.set(k, head, local);
                        }
                    }
                    p = end;
                }
                _ => {
                    let end = self.np_end(p, to);
                    if end == p {
                        self.set(p, root, Dep::Dep);
                        p += 1;
                        continue;
                    }
                    let head = self.np_head(p, end);
                    let dep = if self.is_temporal_np(p, end) {
                        Dep::Npadvmod
                    } else if copular && objects == 0 {
                        Dep::Attr
                    } else if objects == 0
                        && end - p == 1
                        && self.tags[p].is(Pos::Pron)
                        && end < to
                        && self.np_end(end, to) > end
                    {
                        Dep::Dative
                    } else {
                        Dep::Dobj
                    };
                    self.set(head, root, dep);
                    self.attach_np_internals(p, end, head);
                    if dep == Dep::Npadvmod {
                        last_np = None;
                    } else {
                        objects += 1;
                        last_np = Some(head);
                    }
                    last_pobj = None;
                    p = end;
                }
            }
        }
    }

    fn adjective_opens_np(&self, p: usize, to: usize) -> bool {
        let end = self.np_end(p, to);
        end > p && (p..end).any(|k| matches!(self.tags[k].pos, Pos::Noun | Pos::Propn | Pos::Num))
    }

    fn adjp_end(&self, p: usize, to: usize) -> usize {
        let mut k = p;
        while k < to {
            match self.tags[k].pos {
                Pos::Adj | Pos::Adv => k += 1,
                Pos::Cconj if k + 1 < to && self.tags[k + 1].is(Pos::Adj) => k += 1,
                _ => break,
            }
        }
        k.max(p + 1)
    }

    fn clause_follows(&self, from: usize, to: usize) -> bool {
        let end = self.np_end(from, to);
        end > from && end < to && self.tags[end].is_verbal()
    }

    fn next_clause_punct(&self, from: usize, to: usize) -> usize {
        (from..to)
            .find(|&k| self.tags[k].is_clause_punct() || (self.tags[k].is(Pos::Punct) && k + 1 == self.len()))
            .unwrap_or(to)
    }

    // ---- phrases -----------------------------------------------------

    /// Greedy noun phrase starting at `p`; returns its exclusive end.
    fn np_end(&self, p: usize, limit: usize) -> usize {
        let mut q = p;
        let mut content = false;
        while q < limit {
            let t = &self.tags[q];
            match t.pos {
                Pos::Det if !content => q += 1,
                Pos::Pron if POSSESSIVES.contains(t.lower.as_str()) && !content => q += 1,
                Pos::Pron if !content && !t.is_relative() && t.lower != "there" => {
                    return q + 1;
                }
                _ if content && self.starts_temporal(q, limit) => break,
                Pos::Noun | Pos::Propn | Pos::Num | Pos::Adj | Pos::Sym => {
                    content = true;
                    q += 1;
                }
                Pos::Part if t.is_possessive_marker() && content => q += 1,
                Pos::Cconj if content => {
                    let conjunct_end = self.np_end(q + 1, limit);
                    let clause_follows = conjunct_end < limit && self.tags[conjunct_end].is_verbal();
                    if conjunct_end > q + 1 && !clause_follows {
                        q = conjunct_end;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        q
    }

    /// "last week", "yesterday": a time expression trailing a noun phrase.
    fn starts_temporal(&self, q: usize, limit: usize) -> bool {
        let word = self.tags[q].lower.as_str();
        if matches!(word, "today" | "yesterday" | "tomorrow" | "tonight") {
            return true;
        }
        TEMPORAL_MODIFIERS.contains(word)
            && q + 1 < limit
            && TEMPORAL_WORDS.contains(self.tags[q + 1].lower.as_str())
    }

    /// Last nominal of the phrase, or its last token.
    fn np_head(&self, start: usize, end: usize) -> usize {
        (start..end)
            .rev()
            .find(|&k| {
                let t = &self.tags[k];
                t.pos.is_nominal() && !self.follows_coordinator(start, k)
            })
            .or_else(|| (start..end).rev().find(|&k| self.tags[k].pos.is_nominal()))
            .unwrap_or(end.saturating_sub(1).max(start))
    }

    fn follows_coordinator(&self, start: usize, k: usize) -> bool {
        (start..k).any(|j| self.tags[j].is(Pos::Cconj))
    }

    fn attach_np_internals(&mut self, start: usize, end: usize, head: usize) {
        let mut after_cc = false;
        for k in start..end {
            if k == head {
                continue;
            }
            let t = &self.tags[k];
            let dep = match t.pos {
                Pos::Det => Dep::Det,
                Pos::Pron if POSSESSIVES.contains(t.lower.as_str()) => Dep::Poss,
                Pos::Adj => Dep::Amod,
                Pos::Num => Dep::Nummod,
                Pos::Sym => Dep::Quantmod,
                Pos::Part => Dep::Case,
                Pos::Cconj => {
                    after_cc = true;
                    Dep::Cc
                }
                Pos::Noun | Pos::Propn | Pos::Pron if after_cc => Dep::Conj,
                Pos::Noun | Pos::Propn | Pos::Pron => Dep::Compound,
                _ => Dep::Dep,
            };
            self.set(k, head, dep);
        }
    }

    fn pp_end(&self, p: usize, to: usize) -> usize {
        let object_start = p + 1;
        if object_start >= to {
            return object_start.min(to);
        }
        if self.tags[object_start].is(Pos::Verb) {
            return self.next_clause_punct(object_start, to);
        }
        let end = self.np_end(object_start, to);
        end.max(object_start)
    }

    /// Attach `prep` at `p` to `parent`; returns the prepositional object.
    fn attach_pp(&mut self, p: usize, end: usize, parent: usize) -> Option<usize> {
        self.set(p, parent, Dep::Prep);
        if p + 1 >= end {
            return None;
        }
        if self.tags[p + 1].is(Pos::Verb) {
            self.attach_span(p + 1, end, p, Dep::Pcomp);
            return None;
        }
        let np_end = self.np_end(p + 1, end);
        if np_end == p + 1 {
            self.attach_span(p + 1, end, p, Dep::Pobj);
            return None;
        }
        let head = self.np_head(p + 1, np_end);
        self.set(head, p, Dep::Pobj);
        self.attach_np_internals(p + 1, np_end, head);
        if np_end < end {
            self.attach_tail(np_end, end, head);
        }
        Some(head)
    }

    /// Attach whatever follows a noun phrase inside a span to that phrase.
    fn attach_tail(&mut self, from: usize, to: usize, head: usize) {
        let mut k = from;
        while k < to {
            let t = &self.tags[k];
            if t.is(Pos::Adp) && !self.tags[k].is_relative() {
                let end = self.pp_end(k, to);
                self.attach_pp(k, end, head);
                k = end.max(k + 1);
            } else if t.is(Pos::Punct) {
                self.set(k, head, Dep::Punct);
                k += 1;
            } else {
                let end = self.next_clause_punct(k + 1, to).max(k + 1);
                let dep = if t.is_relative() || t.is_verbal() {
                    Dep::Relcl
                } else {
                    Dep::Dep
                };
                self.attach_span(k, end, head, dep);
                k = end;
            }
        }
    }

    /// Attach an arbitrary contiguous span under one local head.
    fn attach_span(&mut self, start: usize, end: usize, parent: usize, dep: Dep) -> usize {
        let groups = self.groups_in(start, end);
        let head = groups
            .iter()
            .find(|g| !(g.start > start && self.tags[g.start - 1].is(Pos::Adp)))
            .map(|g| g.head)
            .or_else(|| (start..end).find(|&k| self.tags[k].pos.is_nominal()))
            .unwrap_or(start);
        self.set(head, parent, dep);
        for k in start..end {
            if k == head {
                continue;
            }
            let local = self.local_dep(k, head);
            self.set(k, head, local);
        }
        head
    }

    fn local_dep(&self, k: usize, head: usize) -> Dep {
        let t = &self.tags[k];
        match t.pos {
            Pos::Det => Dep::Det,
            Pos::Adj => Dep::Amod,
            Pos::Num => Dep::Nummod,
            Pos::Sym => Dep::Quantmod,
            Pos::Aux => Dep::Aux,
            Pos::Part if t.is_negation() => Dep::Neg,
            Pos::Part if t.is_infinitive_marker() => Dep::Aux,
            Pos::Part => Dep::Case,
            Pos::Adp => Dep::Prep,
            Pos::Sconj => Dep::Mark,
            Pos::Adv => Dep::Advmod,
            Pos::Punct => Dep::Punct,
            Pos::Cconj => Dep::Cc,
            Pos::Pron | Pos::Noun | Pos::Propn if k < head => Dep::Nsubj,
            Pos::Pron | Pos::Noun | Pos::Propn => Dep::Dobj,
            _ => Dep::Dep,
        }
    }

    fn is_temporal_np(&self, start: usize, end: usize) -> bool {
        let words: Vec<&str> = (start..end).map(|k| self.tags[k].lower.as_str()).collect();
        match words.as_slice() {
            [single] => {
                TEMPORAL_WORDS.contains(*single)
                    && !matches!(*single, "day" | "year" | "week" | "month")
            }
            [modifier, noun] => {
                TEMPORAL_MODIFIERS.contains(*modifier) && TEMPORAL_WORDS.contains(*noun)
            }
            _ => false,
        }
    }

    /// No predicate at all: root the first noun phrase and hang the rest off it.
    fn attach_verbless(&mut self) -> usize {
        let n = self.len();
        let start = (0..n)
            .find(|&k| !self.tags[k].is(Pos::Punct))
            .unwrap_or(0);
        let end = self.np_end(start, n).max(start + 1).min(n);
        let root = self.np_head(start, end);
        self.set(root, root, Dep::Root);
        self.attach_np_internals(start, end, root);
        for k in 0..n {
            if self.heads[k].is_none() {
                let dep = if self.tags[k].is(Pos::Punct) { Dep::Punct } else { Dep::Dep };
                self.set(k, root, dep);
            }
        }
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ParseTree {
        ShallowParser::new().parse(text)
    }

    fn find(tree: &ParseTree, text: &str) -> usize {
        tree.tokens()
            .iter()
            .position(|t| t.text == text)
            .unwrap_or_else(|| panic!("token {text:?} not found"))
    }

    fn dependents(tree: &ParseTree, head: usize, dep: Dep) -> Vec<String> {
        tree.children(head)
            .filter(|&c| tree.token(c).dep == dep)
            .map(|c| tree.subtree_text(c))
            .collect()
    }

    #[test]
    fn active_transitive_clause() {
        let tree = parse("The company launched a new product last week.");
        let root = tree.root().unwrap();
        assert_eq!(tree.token(root).text, "launched");
        assert_eq!(tree.token(root).lemma, "launch");
        assert_eq!(tree.token(root).pos, Pos::Verb);
        assert_eq!(dependents(&tree, root, Dep::Nsubj), vec!["The company"]);
        assert_eq!(dependents(&tree, root, Dep::Dobj), vec!["a new product"]);
        assert_eq!(dependents(&tree, root, Dep::Npadvmod), vec!["last week"]);
    }

    #[test]
    fn passive_clause_with_prepositional_complement() {
        let tree = parse("The Eiffel Tower is located in Paris.");
        let root = tree.root().unwrap();
        assert_eq!(tree.token(root).text, "located");
        assert_eq!(dependents(&tree, root, Dep::Nsubjpass), vec!["The Eiffel Tower"]);
        assert_eq!(dependents(&tree, root, Dep::Auxpass), vec!["is"]);
        assert_eq!(dependents(&tree, root, Dep::Prep), vec!["in Paris"]);
    }

    #[test]
    fn expletive_subject() {
        let tree = parse("There was a loud noise in the street.");
        let root = tree.root().unwrap();
        assert_eq!(tree.token(root).lemma, "be");
        assert_eq!(dependents(&tree, root, Dep::Expl), vec!["There"]);
        assert!(dependents(&tree, root, Dep::Nsubj).is_empty());
        assert_eq!(
            dependents(&tree, root, Dep::Attr),
            vec!["a loud noise in the street"]
        );
    }

    #[test]
    fn copula_with_adjective_complement() {
        let tree = parse("The tower is not very tall.");
        let root = tree.root().unwrap();
        assert_eq!(tree.token(root).text, "is");
        assert_eq!(dependents(&tree, root, Dep::Neg), vec!["not"]);
        assert_eq!(dependents(&tree, root, Dep::Acomp), vec!["very tall"]);
    }

    #[test]
    fn relative_clause_stays_inside_subject() {
        let tree = parse("The man who sold the car lives in Delhi.");
        let root = tree.root().unwrap();
        assert_eq!(tree.token(root).text, "lives");
        assert_eq!(
            dependents(&tree, root, Dep::Nsubj),
            vec!["The man who sold the car"]
        );
    }

    #[test]
    fn participial_modifier_hangs_off_the_subject() {
        let tree = parse(
            "The vaccine, developed by scientists at Oxford, has been approved for emergency use in India.",
        );
        let root = tree.root().unwrap();
        assert_eq!(tree.token(root).text, "approved");
        assert_eq!(dependents(&tree, root, Dep::Auxpass), vec!["been"]);
        assert_eq!(
            dependents(&tree, root, Dep::Nsubjpass),
            vec!["The vaccine, developed by scientists at Oxford"]
        );
        assert_eq!(
            dependents(&tree, root, Dep::Prep),
            vec!["for emergency use", "in India"]
        );
        assert!(dependents(&tree, root, Dep::Ccomp).is_empty());

        let vaccine = find(&tree, "vaccine");
        assert_eq!(
            dependents(&tree, vaccine, Dep::Acl),
            vec!["developed by scientists at Oxford"]
        );
    }

    #[test]
    fn participial_modifier_before_an_active_verb() {
        let tree = parse("The bridge, built in 1932 by a British firm, collapsed yesterday after heavy rain.");
        let root = tree.root().unwrap();
        assert_eq!(tree.token(root).text, "collapsed");
        assert_eq!(
            dependents(&tree, root, Dep::Nsubj),
            vec!["The bridge, built in 1932 by a British firm"]
        );
        assert_eq!(dependents(&tree, root, Dep::Prep), vec!["after heavy rain"]);
    }

    #[test]
    fn lone_participle_phrase_keeps_its_root() {
        let tree = parse("The vaccine, developed by scientists at Oxford.");
        let root = tree.root().unwrap();
        assert_eq!(tree.token(root).text, "developed");
    }

    #[test]
    fn subordinate_clause_is_not_the_root() {
        let tree = parse("Because it rained, the match was cancelled.");
        let root = tree.root().unwrap();
        assert_eq!(tree.token(root).text, "cancelled");
        assert_eq!(dependents(&tree, root, Dep::Advcl), vec!["Because it rained"]);
        assert_eq!(dependents(&tree, root, Dep::Nsubjpass), vec!["the match"]);
    }

    #[test]
    fn possessive_noun_phrase() {
        let tree = parse("India's agency sanctioned a loan.");
        let root = tree.root().unwrap();
        assert_eq!(tree.token(root).lemma, "sanction");
        assert_eq!(dependents(&tree, root, Dep::Nsubj), vec!["India's agency"]);
        let agency = find(&tree, "agency");
        assert_eq!(tree.token(find(&tree, "'s")).head, agency);
    }

    #[test]
    fn verbless_text_has_nominal_root() {
        let tree = parse("A quiet evening");
        let root = tree.root().unwrap();
        assert_eq!(tree.token(root).text, "evening");
        assert_eq!(tree.token(root).pos, Pos::Noun);
    }

    #[test]
    fn every_token_is_attached() {
        let tree = parse("Reports say, however, that prices rose and wages fell; analysts disagree.");
        let root = tree.root().unwrap();
        for (i, token) in tree.tokens().iter().enumerate() {
            assert!(token.head < tree.len(), "token {i} has a dangling head");
            if i != root {
                assert_ne!(token.dep, Dep::Root);
            }
        }
        assert_eq!(tree.subtree(root).len(), tree.len());
    }

    #[test]
    fn empty_input_yields_empty_tree() {
        assert!(parse("   ").is_empty());
    }
}
