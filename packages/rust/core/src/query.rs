//! Search-query derivation from a raw question.
//!
//! Pure string functions: subject extraction, the ambiguity check, the
//! equipment-code filter, and script detection.

use std::sync::LazyLock;

use regex::Regex;

use crate::intent;

/// Clauses that wrap a subject. An "about" clause names the subject even
/// when a replacement clause is also present, so it is tried first.
static SUBJECT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // "<subject>에 관한": about <subject>
        r"(.+?)에 관한",
        // "<subject> 교체 방법": how to replace <subject>
        r"(.+?)\s*교체\s*방법",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Latin equipment code followed by the gauge suffix word.
static EQUIPMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z]+)\s*게이지").expect("valid regex"));

/// Hangul jamo, compatibility jamo, and precomposed syllables.
static HANGUL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x{1100}-\x{11FF}\x{3130}-\x{318F}\x{AC00}-\x{D7A3}]").expect("valid regex")
});

/// Derive the term to translate and search for.
///
/// Returns the captured subject of the first matching clause pattern, or the
/// whole trimmed question when none yields a non-empty subject.
pub fn extract_search_term(question: &str) -> String {
    for pattern in SUBJECT_PATTERNS.iter() {
        if let Some(subject) = pattern.captures(question).and_then(|c| c.get(1)) {
            let subject = subject.as_str().trim();
            if !subject.is_empty() {
                return subject.to_string();
            }
        }
    }
    question.trim().to_string()
}

/// A procedural request with nothing to extract a subject from.
///
/// Only the clause patterns above count as extraction, so phrasings like
/// "와이어 교체 절차" are ambiguous too.
pub fn is_ambiguous(question: &str) -> bool {
    intent::mentions_procedure(question) && extract_search_term(question) == question.trim()
}

/// Equipment filter token, e.g. `"FL 게이지"` → `"FLGauge"`.
pub fn extract_equipment_filter(question: &str) -> Option<String> {
    EQUIPMENT_RE
        .captures(question)
        .map(|caps| format!("{}Gauge", &caps[1]))
}

pub fn is_english_only(question: &str) -> bool {
    !HANGUL_RE.is_match(question)
}

/// Final search string: the equipment filter, if any, then the English term.
pub fn compose_query(filter: Option<&str>, english: &str) -> String {
    match filter {
        Some(filter) => format!("{filter} {english}"),
        None => english.to_string(),
    }
}
