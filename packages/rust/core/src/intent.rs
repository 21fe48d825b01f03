//! Keyword-driven intent classification.
//!
//! Keywords co-occur freely in real questions ("교체 절차 설명해줘"), so the
//! rules form an ordered table and the first match wins.

use std::sync::LazyLock;

use regex::Regex;

use deskbot_shared::Intent;

use crate::query;

const EXPLAIN_KEYWORDS: &[&str] = &["설명"];
const TERM_KEYWORDS: &[&str] = &["단어", "용어", "포함"];
const PROCEDURE_KEYWORDS: &[&str] = &["교체", "방법", "절차"];
const DOCUMENT_KEYWORDS: &[&str] = &["문서", "내용"];

static ENGLISH_EXPLAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)explain|describe").expect("valid regex"));

/// One row of the classification table.
struct Rule {
    intent: Intent,
    matches: fn(&str) -> bool,
}

/// Evaluated top to bottom; [`Intent::Listing`] when nothing matches.
const RULES: &[Rule] = &[
    Rule {
        intent: Intent::Ambiguous,
        matches: query::is_ambiguous,
    },
    Rule {
        intent: Intent::Explain,
        matches: wants_explanation,
    },
    Rule {
        intent: Intent::TermLookup,
        matches: mentions_term,
    },
    Rule {
        intent: Intent::Procedure,
        matches: mentions_procedure,
    },
    Rule {
        intent: Intent::FullDocument,
        matches: wants_full_document,
    },
];

/// Classify a raw question.
pub fn classify(question: &str) -> Intent {
    RULES
        .iter()
        .find(|rule| (rule.matches)(question))
        .map(|rule| rule.intent)
        .unwrap_or(Intent::Listing)
}

fn contains_any(question: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| question.contains(k))
}

fn wants_explanation(question: &str) -> bool {
    contains_any(question, EXPLAIN_KEYWORDS)
        || (query::is_english_only(question) && ENGLISH_EXPLAIN_RE.is_match(question))
}

fn mentions_term(question: &str) -> bool {
    contains_any(question, TERM_KEYWORDS)
}

pub(crate) fn mentions_procedure(question: &str) -> bool {
    contains_any(question, PROCEDURE_KEYWORDS)
}

fn wants_full_document(question: &str) -> bool {
    contains_any(question, DOCUMENT_KEYWORDS)
}
