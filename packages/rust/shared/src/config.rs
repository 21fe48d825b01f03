//! Application configuration for deskbot.
//!
//! User config lives at `~/.deskbot/deskbot.toml`. The file only names the
//! environment variables that hold credentials; the values themselves are
//! read once at startup and frozen into the runtime settings structs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DeskbotError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "deskbot.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".deskbot";

// ---------------------------------------------------------------------------
// Config structs (matching deskbot.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Help-center API settings.
    #[serde(default)]
    pub helpcenter: HelpCenterConfig,

    /// Completion API settings.
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Answer composition settings.
    #[serde(default)]
    pub chat: ChatConfig,
}

/// `[helpcenter]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpCenterConfig {
    /// Explicit API base (e.g. `https://acme.zendesk.com/api/v2`).
    /// When unset, it is derived from the subdomain env var.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Name of the env var holding the help-center subdomain.
    #[serde(default = "default_subdomain_env")]
    pub subdomain_env: String,

    /// Name of the env var holding the agent email.
    #[serde(default = "default_email_env")]
    pub email_env: String,

    /// Name of the env var holding the API token.
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Locale filter for search; empty disables the filter.
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Request timeout in seconds.
    #[serde(default = "default_helpcenter_timeout")]
    pub timeout_secs: u64,
}

impl Default for HelpCenterConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            subdomain_env: default_subdomain_env(),
            email_env: default_email_env(),
            token_env: default_token_env(),
            locale: default_locale(),
            timeout_secs: default_helpcenter_timeout(),
        }
    }
}

fn default_subdomain_env() -> String {
    "ZENDESK_SUBDOMAIN".into()
}
fn default_email_env() -> String {
    "ZENDESK_EMAIL".into()
}
fn default_token_env() -> String {
    "ZENDESK_API_TOKEN".into()
}
fn default_locale() -> String {
    "ko".into()
}
fn default_helpcenter_timeout() -> u64 {
    30
}

/// `[completion]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// OpenAI-compatible API base.
    #[serde(default = "default_completion_base_url")]
    pub base_url: String,

    /// Model used for translation and summaries.
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds.
    #[serde(default = "default_completion_timeout")]
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            base_url: default_completion_base_url(),
            model: default_model(),
            timeout_secs: default_completion_timeout(),
        }
    }
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn default_completion_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_completion_timeout() -> u64 {
    60
}

/// `[chat]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Articles shown per answer.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Maximum results requested from search.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Matching articles collected for a term lookup.
    #[serde(default = "default_term_match_limit")]
    pub term_match_limit: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            search_limit: default_search_limit(),
            term_match_limit: default_term_match_limit(),
        }
    }
}

fn default_page_size() -> usize {
    10
}
fn default_search_limit() -> usize {
    100
}
fn default_term_match_limit() -> usize {
    3
}

// ---------------------------------------------------------------------------
// Runtime settings (config file + environment, immutable after startup)
// ---------------------------------------------------------------------------

/// Resolved help-center connection settings.
#[derive(Clone)]
pub struct HelpCenterSettings {
    /// API base without trailing slash, e.g. `https://acme.zendesk.com/api/v2`.
    pub base_url: String,
    pub email: String,
    pub api_token: String,
    pub locale: Option<String>,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for HelpCenterSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelpCenterSettings")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .field("locale", &self.locale)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl HelpCenterSettings {
    /// Resolve from the config file, reading credentials from the process environment.
    pub fn from_env(config: &AppConfig) -> Result<Self> {
        Self::resolve(config, |name| std::env::var(name).ok())
    }

    /// Resolve using an arbitrary variable lookup.
    pub fn resolve(config: &AppConfig, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let hc = &config.helpcenter;

        let base_url = match &hc.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => {
                let subdomain = required_var(&lookup, &hc.subdomain_env)?;
                format!("https://{subdomain}.zendesk.com/api/v2")
            }
        };
        Url::parse(&base_url).map_err(|e| {
            DeskbotError::config(format!("invalid help-center base URL '{base_url}': {e}"))
        })?;

        let locale = Some(hc.locale.trim().to_string()).filter(|l| !l.is_empty());

        Ok(Self {
            base_url,
            email: required_var(&lookup, &hc.email_env)?,
            api_token: required_var(&lookup, &hc.token_env)?,
            locale,
            timeout_secs: hc.timeout_secs,
        })
    }
}

/// Resolved completion API settings.
#[derive(Clone)]
pub struct CompletionSettings {
    /// API base without trailing slash.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for CompletionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl CompletionSettings {
    /// Resolve from the config file, reading the API key from the process environment.
    pub fn from_env(config: &AppConfig) -> Result<Self> {
        Self::resolve(config, |name| std::env::var(name).ok())
    }

    /// Resolve using an arbitrary variable lookup.
    pub fn resolve(config: &AppConfig, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let c = &config.completion;
        let api_key = required_var(&lookup, &c.api_key_env).map_err(|_| {
            DeskbotError::config(format!(
                "completion API key not found. Set the {} environment variable.",
                c.api_key_env
            ))
        })?;

        Ok(Self {
            base_url: c.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: c.model.clone(),
            timeout_secs: c.timeout_secs,
        })
    }
}

/// Answer composition settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatSettings {
    pub page_size: usize,
    pub search_limit: usize,
    pub term_match_limit: usize,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self::from(&ChatConfig::default())
    }
}

impl From<&ChatConfig> for ChatSettings {
    fn from(config: &ChatConfig) -> Self {
        Self {
            page_size: config.page_size.max(1),
            search_limit: config.search_limit.max(1),
            term_match_limit: config.term_match_limit.max(1),
        }
    }
}

fn required_var(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String> {
    match lookup(name) {
        Some(val) if !val.trim().is_empty() => Ok(val.trim().to_string()),
        _ => Err(DeskbotError::config(format!(
            "environment variable {name} is not set"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.deskbot/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| DeskbotError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.deskbot/deskbot.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DeskbotError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| DeskbotError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| DeskbotError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| DeskbotError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DeskbotError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
