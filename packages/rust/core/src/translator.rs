//! Korean-to-English search term resolution.

use tracing::{debug, instrument};

use deskbot_completion::{Completer, Message};
use deskbot_shared::{DeskbotError, Result};

use crate::query;

const TRANSLATE_PROMPT: &str = "아래 한국어 단어나 문구를 헬프센터 검색에 가장 적합한 영어 단어/문구로 번역하세요. \
     번역 결과만 답하세요.";

/// Turns a question into the English term used for search.
pub struct Translator<'a, C> {
    completer: &'a C,
}

impl<'a, C: Completer> Translator<'a, C> {
    pub fn new(completer: &'a C) -> Self {
        Self { completer }
    }

    /// English-only questions pass through trimmed with no completion call.
    /// Anything else has its search term translated.
    #[instrument(skip_all)]
    pub async fn resolve_query_term(&self, question: &str) -> Result<String> {
        if query::is_english_only(question) {
            return Ok(question.trim().to_string());
        }

        let term = query::extract_search_term(question);
        let messages = [Message::system(TRANSLATE_PROMPT), Message::user(term.as_str())];

        let translated = self
            .completer
            .complete(&messages)
            .await
            .map_err(|e| DeskbotError::TranslationFailed(e.to_string()))?;

        let translated = translated.trim();
        if translated.is_empty() {
            return Err(DeskbotError::TranslationFailed(
                "completion returned empty text".into(),
            ));
        }

        debug!(%term, english = %translated, "search term translated");
        Ok(translated.to_string())
    }
}
