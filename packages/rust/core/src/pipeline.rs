//! End-to-end chat turn: question → translate → search → classify → compose.

use std::time::{Duration, Instant};

use tracing::{info, instrument};

use deskbot_completion::Completer;
use deskbot_helpcenter::ArticleSource;
use deskbot_shared::{ChatSettings, Intent, Result, SearchResultPage};

use crate::composer::{self, CLARIFICATION, ResponseComposer};
use crate::intent;
use crate::query;
use crate::translator::Translator;

/// Progress callback for reporting turn status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called once the answer is ready.
    fn done(&self, elapsed: Duration);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _elapsed: Duration) {}
}

/// Answers help-center questions. Holds no per-turn state, so one pipeline
/// can serve any number of turns.
pub struct ChatPipeline<A, C> {
    articles: A,
    completer: C,
    settings: ChatSettings,
}

impl<A: ArticleSource, C: Completer> ChatPipeline<A, C> {
    pub fn new(articles: A, completer: C, settings: ChatSettings) -> Self {
        Self {
            articles,
            completer,
            settings,
        }
    }

    /// Answer one question.
    pub async fn answer(&self, question: &str) -> Result<String> {
        self.answer_with_progress(question, &SilentProgress).await
    }

    /// Answer one question, reporting each phase.
    ///
    /// A bare procedural request is answered with a clarification before any
    /// network call. Zero search hits produce a "not found" message. Every
    /// other failure propagates unchanged.
    #[instrument(skip_all, fields(question = %question.trim()))]
    pub async fn answer_with_progress(
        &self,
        question: &str,
        progress: &dyn ProgressReporter,
    ) -> Result<String> {
        let start = Instant::now();

        if query::is_ambiguous(question) {
            info!("procedural request without a subject");
            progress.done(start.elapsed());
            return Ok(CLARIFICATION.to_string());
        }

        let filter = query::extract_equipment_filter(question);

        progress.phase("검색어 번역 중");
        let english = Translator::new(&self.completer)
            .resolve_query_term(question)
            .await?;
        let final_query = query::compose_query(filter.as_deref(), &english);

        progress.phase("문서 검색 중");
        let hits = self
            .articles
            .search(&final_query, self.settings.search_limit)
            .await?;

        if hits.is_empty() {
            info!(query = %final_query, "search returned no articles");
            progress.done(start.elapsed());
            return Ok(composer::not_found_message(
                &original_subject(question),
                &english,
            ));
        }

        let intent = intent::classify(question);
        let page = SearchResultPage::first(hits, self.settings.page_size);
        info!(%intent, query = %final_query, total = page.total, "composing answer");

        progress.phase(phase_label(intent));
        let answer = ResponseComposer::new(&self.articles, &self.completer, self.settings)
            .compose(intent, &page, &english)
            .await?;

        progress.done(start.elapsed());
        info!(elapsed_ms = start.elapsed().as_millis(), "turn complete");
        Ok(answer)
    }
}

/// The question fragment quoted back in the "not found" message.
fn original_subject(question: &str) -> String {
    if query::is_english_only(question) {
        question.trim().to_string()
    } else {
        query::extract_search_term(question)
    }
}

fn phase_label(intent: Intent) -> &'static str {
    match intent {
        Intent::Explain | Intent::Procedure | Intent::TermLookup => "문서 요약 중",
        Intent::FullDocument => "문서 불러오는 중",
        Intent::Ambiguous | Intent::Listing => "결과 정리 중",
    }
}
