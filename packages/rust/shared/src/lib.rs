//! Shared types, error model, and configuration for deskbot.
//!
//! This crate is the foundation depended on by all other deskbot crates.
//! It provides:
//! - [`DeskbotError`], the unified error type
//! - Domain types ([`Article`], [`SearchResultPage`], [`Intent`])
//! - Configuration ([`AppConfig`], runtime settings, config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ChatConfig, ChatSettings, CompletionConfig, CompletionSettings, HelpCenterConfig,
    HelpCenterSettings, config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{DeskbotError, Result};
pub use types::{Article, Intent, SearchResultPage};
