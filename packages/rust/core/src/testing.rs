//! In-memory fakes for the article and completion seams.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use deskbot_completion::{Completer, Message};
use deskbot_helpcenter::ArticleSource;
use deskbot_shared::{Article, DeskbotError, Result};

/// Reply used once scripted replies run out.
pub(crate) const DEFAULT_REPLY: &str = "요약 결과";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ArticleCall {
    Search { query: String, limit: usize },
    Fetch(u64),
}

/// Serves a fixed hit list; `fetch_article` returns the full body.
pub(crate) struct FakeArticles {
    hits: Vec<Article>,
    bodies: HashMap<u64, String>,
    search_status: Option<u16>,
    calls: Mutex<Vec<ArticleCall>>,
}

impl FakeArticles {
    /// `(id, title, full body)` per hit; search hits carry an empty body.
    pub(crate) fn new(hits: &[(u64, &str, &str)]) -> Self {
        Self {
            hits: hits
                .iter()
                .map(|(id, title, _)| Article {
                    id: *id,
                    title: (*title).to_string(),
                    body_text: String::new(),
                    url: format!("https://help.example.com/hc/articles/{id}"),
                })
                .collect(),
            bodies: hits
                .iter()
                .map(|(id, _, body)| (*id, (*body).to_string()))
                .collect(),
            search_status: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `count` hits titled "Article <n>" with body "body <n>".
    pub(crate) fn numbered(count: u64) -> Self {
        let owned: Vec<(u64, String, String)> = (1..=count)
            .map(|i| (i, format!("Article {i}"), format!("body {i}")))
            .collect();
        let hits: Vec<(u64, &str, &str)> = owned
            .iter()
            .map(|(id, t, b)| (*id, t.as_str(), b.as_str()))
            .collect();
        Self::new(&hits)
    }

    pub(crate) fn failing_search(status: u16) -> Self {
        Self {
            search_status: Some(status),
            ..Self::new(&[])
        }
    }

    pub(crate) fn calls(&self) -> Vec<ArticleCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn fetched_ids(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ArticleCall::Fetch(id) => Some(id),
                ArticleCall::Search { .. } => None,
            })
            .collect()
    }
}

impl ArticleSource for FakeArticles {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Article>> {
        self.calls.lock().unwrap().push(ArticleCall::Search {
            query: query.to_string(),
            limit,
        });
        if let Some(status) = self.search_status {
            return Err(DeskbotError::SearchFailed {
                status,
                body: "search unavailable".into(),
            });
        }
        Ok(self.hits.iter().take(limit).cloned().collect())
    }

    async fn fetch_article(&self, id: u64) -> Result<Article> {
        self.calls.lock().unwrap().push(ArticleCall::Fetch(id));
        let hit = self
            .hits
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| DeskbotError::ArticleFetchFailed {
                id,
                status: 404,
                body: "RecordNotFound".into(),
            })?;
        Ok(Article {
            body_text: self.bodies.get(&id).cloned().unwrap_or_default(),
            ..hit.clone()
        })
    }
}

/// Replays scripted replies in order and records every request.
pub(crate) struct FakeCompleter {
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl FakeCompleter {
    pub(crate) fn new(replies: Vec<std::result::Result<String, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }
}

impl Completer for FakeCompleter {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        self.calls.lock().unwrap().push(messages.to_vec());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Ok(text)) => Ok(text),
            Some(Err(msg)) => Err(DeskbotError::Completion(msg)),
            None => Ok(DEFAULT_REPLY.to_string()),
        }
    }
}
