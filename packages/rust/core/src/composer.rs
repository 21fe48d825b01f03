//! Response composition per intent.
//!
//! Every branch is terminal: one call produces the complete answer text for
//! the turn, or an error. No partial answers are returned.

use tracing::{debug, info, instrument};

use deskbot_completion::{Completer, Message};
use deskbot_helpcenter::ArticleSource;
use deskbot_shared::{Article, ChatSettings, DeskbotError, Intent, Result, SearchResultPage};

/// Reply for a bare procedural request.
pub const CLARIFICATION: &str = "어떤 장비나 부품의 교체 방법을 알고 싶으신지 알려주세요. \
     예: \"와이어 교체 방법\", \"FL 게이지에 관한 교체 절차\"";

const EXPLAIN_PROMPT: &str = "아래 헬프센터 문서 본문을 읽고, 2~3문장으로 요약해서 설명해 주세요.";

const PROCEDURE_PROMPT: &str =
    "아래 헬프센터 문서 본문을 읽고, 작업 절차를 번호가 매겨진 단계별 목록으로 정리해 주세요.";

/// Body text sent to a single summarization call is cut at this many characters.
const MAX_SUMMARY_INPUT_CHARS: usize = 12_000;

/// Message returned when a search yields nothing.
pub fn not_found_message(subject: &str, english: &str) -> String {
    format!("죄송합니다. \"{subject}\"({english})에 해당하는 문서를 찾지 못했습니다.")
}

fn term_not_found_message(term: &str) -> String {
    format!("죄송합니다. \"{term}\" 용어가 포함된 문서를 찾지 못했습니다.")
}

fn term_prompt(term: &str) -> String {
    format!(
        "아래 헬프센터 문서들에서 \"{term}\" 용어가 어떤 맥락에서 쓰이는지 2~3문장으로 요약해 주세요."
    )
}

fn header(english: &str, shown: usize) -> String {
    format!("“{english}”로 검색한 최상위 {shown}개 문서입니다:\n\n")
}

fn footer(page: &SearchResultPage) -> String {
    if page.has_more() {
        format!(
            "\n\n총 {}건 중 일부만 표시됩니다. 더 보려면 '추가로 알려줘'라고 입력하세요.",
            page.total
        )
    } else {
        String::new()
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}\n\n[... 이하 생략 ...]", &text[..cut]),
        None => text.to_string(),
    }
}

fn list_item(index: usize, article: &Article) -> String {
    if article.url.is_empty() {
        format!("{}. {}", index + 1, article.title)
    } else {
        format!("{}. {}\n   🔗 {}", index + 1, article.title, article.url)
    }
}

// ---------------------------------------------------------------------------
// ResponseComposer
// ---------------------------------------------------------------------------

/// Builds the answer for a classified question from its result page.
pub struct ResponseComposer<'a, A, C> {
    articles: &'a A,
    completer: &'a C,
    settings: ChatSettings,
}

impl<'a, A: ArticleSource, C: Completer> ResponseComposer<'a, A, C> {
    pub fn new(articles: &'a A, completer: &'a C, settings: ChatSettings) -> Self {
        Self {
            articles,
            completer,
            settings,
        }
    }

    /// Compose the answer. `english` is the resolved search term.
    #[instrument(skip_all, fields(intent = %intent, shown = page.len(), total = page.total))]
    pub async fn compose(
        &self,
        intent: Intent,
        page: &SearchResultPage,
        english: &str,
    ) -> Result<String> {
        let Some(top) = page.articles.first() else {
            return Ok(self.listing(page, english));
        };

        match intent {
            Intent::Ambiguous => Ok(CLARIFICATION.to_string()),
            Intent::Explain => self.summarize_top(top, page, english, EXPLAIN_PROMPT).await,
            Intent::Procedure => self.summarize_top(top, page, english, PROCEDURE_PROMPT).await,
            Intent::FullDocument => {
                let article = self.articles.fetch_article(top.id).await?;
                Ok(format!(
                    "{}1. **{}**\n\n{}{}",
                    header(english, page.len()),
                    article.title,
                    article.body_text,
                    footer(page)
                ))
            }
            Intent::TermLookup => self.term_lookup(page, english).await,
            Intent::Listing => Ok(self.listing(page, english)),
        }
    }

    /// Fetch the top article and summarize its body with `prompt`.
    async fn summarize_top(
        &self,
        top: &Article,
        page: &SearchResultPage,
        english: &str,
        prompt: &str,
    ) -> Result<String> {
        let article = self.articles.fetch_article(top.id).await?;
        let summary = self.summarize(prompt, &article.body_text).await?;

        Ok(format!(
            "{}1. **{}**\n\n{}{}",
            header(english, page.len()),
            article.title,
            summary,
            footer(page)
        ))
    }

    async fn term_lookup(&self, page: &SearchResultPage, term: &str) -> Result<String> {
        let matched = self.collect_term_matches(page, term).await?;
        if matched.is_empty() {
            info!(%term, "no fetched article contains the term");
            return Ok(term_not_found_message(term));
        }

        let combined = matched
            .iter()
            .map(|a| format!("# {}\n{}", a.title, a.body_text))
            .collect::<Vec<_>>()
            .join("\n\n");
        let summary = self.summarize(&term_prompt(term), &combined).await?;

        let sources = matched
            .iter()
            .enumerate()
            .map(|(i, a)| list_item(i, a))
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(format!(
            "{}{sources}\n\n{summary}{}",
            header(term, page.len()),
            footer(page)
        ))
    }

    /// Fetch page articles in order, keeping those whose body contains `term`
    /// (case-insensitive), until the match limit is reached.
    pub(crate) async fn collect_term_matches(
        &self,
        page: &SearchResultPage,
        term: &str,
    ) -> Result<Vec<Article>> {
        let needle = term.to_lowercase();
        let mut matched = Vec::new();

        for hit in &page.articles {
            if matched.len() >= self.settings.term_match_limit {
                break;
            }
            let article = self.articles.fetch_article(hit.id).await?;
            if article.body_text.to_lowercase().contains(&needle) {
                debug!(id = article.id, "term found in article");
                matched.push(article);
            }
        }

        Ok(matched)
    }

    fn listing(&self, page: &SearchResultPage, english: &str) -> String {
        let list = page
            .articles
            .iter()
            .enumerate()
            .map(|(i, a)| list_item(i, a))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!("{}{list}{}", header(english, page.len()), footer(page))
    }

    async fn summarize(&self, prompt: &str, body: &str) -> Result<String> {
        let messages = [
            Message::system(prompt),
            Message::user(truncate_chars(body, MAX_SUMMARY_INPUT_CHARS)),
        ];

        let summary = self
            .completer
            .complete(&messages)
            .await
            .map_err(|e| DeskbotError::SummarizationFailed(e.to_string()))?;

        let summary = summary.trim();
        if summary.is_empty() {
            return Err(DeskbotError::SummarizationFailed(
                "completion returned empty text".into(),
            ));
        }
        Ok(summary.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ArticleCall, FakeArticles, FakeCompleter};

    async fn page_of(articles: &FakeArticles, limit: usize, page_size: usize) -> SearchResultPage {
        let hits = articles.search("q", limit).await.unwrap();
        SearchResultPage::first(hits, page_size)
    }

    fn settings() -> ChatSettings {
        ChatSettings::default()
    }

    #[tokio::test]
    async fn listing_numbers_titles_with_urls() {
        let articles = FakeArticles::numbered(2);
        let completer = FakeCompleter::new(vec![]);
        let page = page_of(&articles, 100, 10).await;

        let out = ResponseComposer::new(&articles, &completer, settings())
            .compose(Intent::Listing, &page, "wire")
            .await
            .unwrap();

        assert_eq!(
            out,
            "“wire”로 검색한 최상위 2개 문서입니다:\n\n\
             1. Article 1\n   🔗 https://help.example.com/hc/articles/1\n\n\
             2. Article 2\n   🔗 https://help.example.com/hc/articles/2"
        );
        assert!(completer.calls().is_empty());
        assert!(articles.fetched_ids().is_empty());
    }

    #[test]
    fn list_item_without_url() {
        let article = Article {
            id: 1,
            title: "Gauge".into(),
            body_text: String::new(),
            url: String::new(),
        };
        assert_eq!(list_item(0, &article), "1. Gauge");
    }

    #[tokio::test]
    async fn footer_only_when_more_results_exist() {
        let articles = FakeArticles::numbered(12);
        let completer = FakeCompleter::new(vec![]);
        let page = page_of(&articles, 100, 10).await;

        let out = ResponseComposer::new(&articles, &completer, settings())
            .compose(Intent::Listing, &page, "wire")
            .await
            .unwrap();

        assert!(out.starts_with("“wire”로 검색한 최상위 10개 문서입니다:"));
        assert!(out.contains("10. Article 10"));
        assert!(!out.contains("11. Article 11"));
        assert!(out.ends_with(
            "\n\n총 12건 중 일부만 표시됩니다. 더 보려면 '추가로 알려줘'라고 입력하세요."
        ));
    }

    #[tokio::test]
    async fn explain_summarizes_top_article() {
        let articles = FakeArticles::new(&[(5, "Wire gauge", "<full body>"), (6, "Other", "x")]);
        let completer = FakeCompleter::new(vec![Ok(" 게이지 요약입니다. ".into())]);
        let page = page_of(&articles, 100, 10).await;

        let out = ResponseComposer::new(&articles, &completer, settings())
            .compose(Intent::Explain, &page, "wire gauge")
            .await
            .unwrap();

        assert_eq!(
            out,
            "“wire gauge”로 검색한 최상위 2개 문서입니다:\n\n1. **Wire gauge**\n\n게이지 요약입니다."
        );
        assert_eq!(articles.fetched_ids(), vec![5]);
        let calls = completer.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0], Message::system(EXPLAIN_PROMPT));
        assert_eq!(calls[0][1], Message::user("<full body>"));
    }

    #[tokio::test]
    async fn procedure_uses_step_prompt() {
        let articles = FakeArticles::new(&[(42, "Replacing the wire", "step text")]);
        let completer = FakeCompleter::new(vec![Ok("1. 전원 끄기\n2. 덮개 열기".into())]);
        let page = page_of(&articles, 100, 10).await;

        let out = ResponseComposer::new(&articles, &completer, settings())
            .compose(Intent::Procedure, &page, "wire replacement")
            .await
            .unwrap();

        assert!(out.contains("1. **Replacing the wire**\n\n1. 전원 끄기\n2. 덮개 열기"));
        assert_eq!(completer.calls()[0][0], Message::system(PROCEDURE_PROMPT));
    }

    #[tokio::test]
    async fn full_document_returns_body_verbatim() {
        let articles = FakeArticles::new(&[(9, "Gauge manual", "Line one. Line two.")]);
        let completer = FakeCompleter::new(vec![]);
        let page = page_of(&articles, 100, 10).await;

        let out = ResponseComposer::new(&articles, &completer, settings())
            .compose(Intent::FullDocument, &page, "gauge")
            .await
            .unwrap();

        assert!(out.ends_with("1. **Gauge manual**\n\nLine one. Line two."));
        assert!(completer.calls().is_empty());
        assert_eq!(articles.fetched_ids(), vec![9]);
    }

    #[tokio::test]
    async fn term_matches_keep_order_and_skip_misses() {
        let articles = FakeArticles::new(&[
            (1, "A", "no match here"),
            (2, "B", "Replace the Bearing first"),
            (3, "C", "nothing"),
            (4, "D", "bearing housing"),
            (5, "E", "still nothing"),
        ]);
        let completer = FakeCompleter::new(vec![]);
        let page = page_of(&articles, 100, 10).await;

        let matched = ResponseComposer::new(&articles, &completer, settings())
            .collect_term_matches(&page, "bearing")
            .await
            .unwrap();

        let ids: Vec<u64> = matched.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![2, 4]);
        assert_eq!(articles.fetched_ids(), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn term_lookup_stops_after_limit() {
        let articles = FakeArticles::new(&[
            (1, "A", "bearing"),
            (2, "B", "bearing"),
            (3, "C", "bearing"),
            (4, "D", "bearing"),
            (5, "E", "bearing"),
        ]);
        let completer = FakeCompleter::new(vec![]);
        let page = page_of(&articles, 100, 10).await;

        let out = ResponseComposer::new(&articles, &completer, settings())
            .compose(Intent::TermLookup, &page, "bearing")
            .await
            .unwrap();

        assert_eq!(articles.fetched_ids(), vec![1, 2, 3]);
        let calls = completer.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0], Message::system(term_prompt("bearing")));
        assert!(calls[0][1].content.contains("# C\nbearing"));
        assert!(!calls[0][1].content.contains("# D"));
        assert!(out.contains("3. C"));
        assert!(out.ends_with(crate::testing::DEFAULT_REPLY));
    }

    #[tokio::test]
    async fn term_lookup_without_matches_skips_summary() {
        let articles = FakeArticles::new(&[(1, "A", "gear"), (2, "B", "shaft")]);
        let completer = FakeCompleter::new(vec![]);
        let page = page_of(&articles, 100, 10).await;

        let out = ResponseComposer::new(&articles, &completer, settings())
            .compose(Intent::TermLookup, &page, "bearing")
            .await
            .unwrap();

        assert_eq!(out, term_not_found_message("bearing"));
        assert!(completer.calls().is_empty());
        assert_eq!(articles.calls().last(), Some(&ArticleCall::Fetch(2)));
    }

    #[tokio::test]
    async fn summarization_failure_propagates() {
        let articles = FakeArticles::new(&[(1, "A", "body")]);
        let completer = FakeCompleter::new(vec![Err("HTTP 503".into())]);
        let page = page_of(&articles, 100, 10).await;

        let err = ResponseComposer::new(&articles, &completer, settings())
            .compose(Intent::Explain, &page, "a")
            .await
            .unwrap_err();

        assert!(matches!(err, DeskbotError::SummarizationFailed(_)));
    }

    #[tokio::test]
    async fn fetch_failure_propagates_unchanged() {
        let articles = FakeArticles::new(&[(1, "A", "body")]);
        let completer = FakeCompleter::new(vec![]);
        let mut page = page_of(&articles, 100, 10).await;
        page.articles[0].id = 99;

        let err = ResponseComposer::new(&articles, &completer, settings())
            .compose(Intent::FullDocument, &page, "a")
            .await
            .unwrap_err();

        assert!(matches!(err, DeskbotError::ArticleFetchFailed { id: 99, status: 404, .. }));
    }

    #[test]
    fn truncation_is_char_safe() {
        let body = "가".repeat(10);
        let cut = truncate_chars(&body, 4);
        assert!(cut.starts_with("가가가가\n\n"));
        assert_eq!(truncate_chars("짧은 글", 100), "짧은 글");
    }
}
