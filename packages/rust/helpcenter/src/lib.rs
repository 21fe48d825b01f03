//! Help-center search and article retrieval.
//!
//! [`ArticleClient`] talks to the Zendesk-style help-center REST API and
//! normalizes every hit into an [`Article`] with a plain-text body. The
//! [`ArticleSource`] trait is the seam the chat pipeline depends on, so it can
//! run against in-memory fakes.

mod html;

use std::future::Future;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use deskbot_shared::{Article, DeskbotError, HelpCenterSettings, Result};

pub use html::strip_html;

/// Upper bound the search endpoint accepts for `per_page`.
const MAX_PER_PAGE: usize = 100;

/// User-Agent string for help-center requests.
const USER_AGENT: &str = concat!("deskbot/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// ArticleSource
// ---------------------------------------------------------------------------

/// Where the chat pipeline gets its articles from.
pub trait ArticleSource: Send + Sync {
    /// Search for articles, returning at most `limit` hits in relevance order.
    fn search(&self, query: &str, limit: usize) -> impl Future<Output = Result<Vec<Article>>> + Send;

    /// Fetch a single article with its full body.
    fn fetch_article(&self, id: u64) -> impl Future<Output = Result<Article>> + Send;
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct ArticleResponse {
    article: RawArticle,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    body_text: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

impl From<RawArticle> for Article {
    fn from(raw: RawArticle) -> Self {
        let body_text = match (raw.body_text, raw.body) {
            (Some(text), _) => text,
            (None, Some(html)) => strip_html(&html),
            (None, None) => String::new(),
        };

        Self {
            id: raw.id,
            title: raw.title.unwrap_or_default(),
            body_text,
            url: raw.html_url.or(raw.url).unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// ArticleClient
// ---------------------------------------------------------------------------

/// HTTP client for the help-center API.
///
/// The Basic credential is encoded once at construction and attached to every
/// request as a default header.
pub struct ArticleClient {
    client: Client,
    base_url: String,
    locale: Option<String>,
}

impl ArticleClient {
    /// Build a client from resolved settings.
    pub fn new(settings: &HelpCenterSettings) -> Result<Self> {
        let credential = STANDARD.encode(format!("{}/token:{}", settings.email, settings.api_token));
        let mut auth = HeaderValue::from_str(&format!("Basic {credential}"))
            .map_err(|e| DeskbotError::config(format!("invalid help-center credentials: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| DeskbotError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            locale: settings.locale.clone(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/help_center/articles/search.json", self.base_url)
    }

    fn article_url(&self, id: u64) -> String {
        format!("{}/help_center/articles/{id}.json", self.base_url)
    }
}

impl ArticleSource for ArticleClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Article>> {
        let url = self.search_url();
        let per_page = limit.clamp(1, MAX_PER_PAGE).to_string();

        let mut params: Vec<(&str, &str)> = vec![("query", query), ("per_page", per_page.as_str())];
        if let Some(locale) = &self.locale {
            params.push(("locale", locale.as_str()));
        }

        debug!(%url, "searching help center");
        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| DeskbotError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeskbotError::SearchFailed {
                status: status.as_u16(),
                body,
            });
        }

        let payload: SearchResponse = response
            .json()
            .await
            .map_err(|e| DeskbotError::parse(format!("search response: {e}")))?;

        let mut articles: Vec<Article> = payload.results.into_iter().map(Article::from).collect();
        articles.truncate(limit);

        info!(hits = articles.len(), "help-center search complete");
        Ok(articles)
    }

    #[instrument(skip(self))]
    async fn fetch_article(&self, id: u64) -> Result<Article> {
        let url = self.article_url(id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DeskbotError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeskbotError::ArticleFetchFailed {
                id,
                status: status.as_u16(),
                body,
            });
        }

        let payload: ArticleResponse = response
            .json()
            .await
            .map_err(|e| DeskbotError::parse(format!("article {id} response: {e}")))?;

        let article = Article::from(payload.article);
        debug!(title = %article.title, body_len = article.body_text.len(), "article fetched");
        Ok(article)
    }
}
