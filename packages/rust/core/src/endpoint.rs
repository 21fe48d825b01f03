//! Transport-agnostic mapping of a chat HTTP request onto the pipeline.

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{error, warn};

use deskbot_completion::Completer;
use deskbot_helpcenter::ArticleSource;

use crate::pipeline::ChatPipeline;

const MISSING_QUESTION: &str = "Missing `question` or `message` in body";

/// Status code and JSON body to send back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointResponse {
    pub status: u16,
    pub body: Value,
}

impl EndpointResponse {
    fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }
}

/// Handle one chat request.
///
/// Only `POST` is accepted. The body must be a JSON object carrying a
/// non-empty `question` string, or a non-empty `message` when `question` is
/// absent.
pub async fn handle_chat<A: ArticleSource, C: Completer>(
    pipeline: &ChatPipeline<A, C>,
    method: &str,
    body: &str,
) -> EndpointResponse {
    if !method.eq_ignore_ascii_case("POST") {
        return EndpointResponse::error(405, "Method not allowed");
    }

    let Some(question) = question_from_body(body) else {
        warn!("chat request without a question");
        return EndpointResponse::error(400, MISSING_QUESTION);
    };

    match pipeline.answer(&question).await {
        Ok(answer) => EndpointResponse {
            status: 200,
            body: json!({ "answer": answer }),
        },
        Err(e) => {
            error!(error = %e, "chat turn failed");
            EndpointResponse::error(500, e.to_string())
        }
    }
}

/// `message` is consulted only when `question` is absent or null.
fn question_from_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let field = match value.get("question") {
        Some(question) if !question.is_null() => question,
        _ => value.get("message")?,
    };
    field
        .as_str()
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}
