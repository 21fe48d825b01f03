//! Error types for deskbot.
//!
//! Library crates use [`DeskbotError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all deskbot operations.
#[derive(Debug, thiserror::Error)]
pub enum DeskbotError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Transport-level HTTP failure (connect, timeout, body read).
    #[error("network error: {0}")]
    Network(String),

    /// The help-center search endpoint answered with a non-success status.
    #[error("help-center search failed: HTTP {status}: {body}")]
    SearchFailed { status: u16, body: String },

    /// The help-center article endpoint answered with a non-success status.
    #[error("help-center article {id} fetch failed: HTTP {status}: {body}")]
    ArticleFetchFailed { id: u64, status: u16, body: String },

    /// Completion API call failed or returned no usable content.
    #[error("completion error: {0}")]
    Completion(String),

    /// Translating the question into a search term failed.
    #[error("translation failed: {0}")]
    TranslationFailed(String),

    /// Summarizing article content failed.
    #[error("summarization failed: {0}")]
    SummarizationFailed(String),

    /// Upstream payload could not be decoded.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DeskbotError>;

impl DeskbotError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
