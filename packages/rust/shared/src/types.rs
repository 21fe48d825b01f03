//! Core domain types for a single chat turn.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Article
// ---------------------------------------------------------------------------

/// A help-center article normalized to plain text.
///
/// `body_text` is derived once from the upstream payload (its `body_text`
/// field when present, otherwise the HTML `body` with tags stripped) and is
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Upstream article identifier.
    pub id: u64,
    /// Article title.
    pub title: String,
    /// Plain-text body.
    pub body_text: String,
    /// Public URL of the article (empty when upstream did not provide one).
    pub url: String,
}

// ---------------------------------------------------------------------------
// SearchResultPage
// ---------------------------------------------------------------------------

/// The first page of a search result, in upstream relevance order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultPage {
    /// Articles shown on this page.
    pub articles: Vec<Article>,
    /// Number of results the search returned in total.
    pub total: usize,
}

impl SearchResultPage {
    /// Take the first `page_size` results, remembering the full count.
    pub fn first(results: Vec<Article>, page_size: usize) -> Self {
        let total = results.len();
        let mut articles = results;
        articles.truncate(page_size);
        Self { articles, total }
    }

    /// Whether results exist beyond this page.
    pub fn has_more(&self) -> bool {
        self.total > self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }
}

// ---------------------------------------------------------------------------
// Intent
// ---------------------------------------------------------------------------

/// What the user wants out of a question. Computed once per question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Bare procedural request with no subject; ask the user to clarify.
    Ambiguous,
    /// Short explanation of the top article.
    Explain,
    /// Where a term occurs across the top articles.
    TermLookup,
    /// Step-by-step procedure from the top article.
    Procedure,
    /// The top article's full text.
    FullDocument,
    /// Plain list of matching articles.
    Listing,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ambiguous => "ambiguous",
            Self::Explain => "explain",
            Self::TermLookup => "term_lookup",
            Self::Procedure => "procedure",
            Self::FullDocument => "full_document",
            Self::Listing => "listing",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
