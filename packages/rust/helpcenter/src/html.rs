//! HTML-to-plain-text reduction for article bodies.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

/// Elements whose text content is never user-visible.
const SKIP_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Reduce an HTML fragment to whitespace-normalized plain text.
///
/// Every tag boundary becomes a single space, entities are decoded, and the
/// result is trimmed.
pub fn strip_html(html: &str) -> String {
    static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

    let fragment = Html::parse_fragment(html);
    let mut pieces: Vec<&str> = Vec::new();

    for node in fragment.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|p| p.value().as_element())
            .is_some_and(|el| SKIP_TAGS.contains(&el.name()));
        if !hidden {
            pieces.push(&**text);
        }
    }

    WS_RE.replace_all(&pieces.join(" "), " ").trim().to_string()
}
