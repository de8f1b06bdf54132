//! news-brief: daily AI news briefs with a durable date-keyed cache.
//!
//! The crate retrieves AI news for a calendar date, or for a free-text query,
//! from a generative-search backend and keeps the state an embedding dashboard
//! renders:
//! - A persistent cache of fetched briefs keyed by date
//! - Two mutually exclusive views: date browsing and search results
//! - One fetch lifecycle (loading, error, success) shared by both views
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI (main.rs)                                      │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Intent dispatch                                  │
//! │  - Orchestrator and fetch lifecycle                 │
//! │  - View state and view model computation            │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Storage Layer │   │ Provider      │
//! │ (ui/)         │   │ (storage/)    │   │ (provider/)   │
//! │ - View model  │   │ - Cache value │   │ - Gemini REST │
//! │ - Text render │   │ - JSON slot   │   │ - Mapping     │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Paths and clock (infrastructure/)                │
//! │  - Error types (domain/error)                       │
//! │  - News model (domain/news)                         │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - JSON log lines to a rotating file                │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```toml
//! # ~/.config/news-brief/config.toml
//! api_key = "..."
//! model = "gemini-3-flash-preview"
//! language = "Simplified Chinese"
//! request_timeout_secs = 120
//! log_level = "debug"
//! ```
//!
//! `GEMINI_API_KEY`, `NEWS_BRIEF_MODEL`, `NEWS_BRIEF_CACHE_FILE` and
//! `NEWS_BRIEF_LOG` override the file.
//!
//! # Example
//!
//! ```rust,no_run
//! use news_brief::{dispatch, initialize, Config, Intent};
//!
//! # async fn run() -> news_brief::Result<()> {
//! let config = Config::default().with_env_overrides();
//! let orchestrator = initialize(&config)?;
//!
//! let today = orchestrator.snapshot().selected_date();
//! dispatch(&orchestrator, Intent::DatePicked(today)).await;
//! dispatch(&orchestrator, Intent::SearchSubmitted("open-weight models".into())).await;
//!
//! let vm = orchestrator.view_model();
//! print!("{}", news_brief::ui::render(&vm, 80));
//!
//! orchestrator.shutdown();
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod provider;
pub mod storage;
pub mod ui;

pub use app::{dispatch, BriefOrchestrator, BriefState, Intent, ViewError, ViewErrorKind, ViewMode};
pub use domain::{
    parse_date, Category, CategoryCounts, DailyBrief, NewsBriefError, NewsItem, Result,
};
pub use ui::FeedViewModel;

use crate::infrastructure::{expand_tilde, get_data_dir, Clock, SystemClock};
use crate::infrastructure::paths::CACHE_FILE_NAME;
use crate::provider::gemini::{GeminiSettings, DEFAULT_BASE_URL, DEFAULT_GEMINI_MODEL};
use crate::provider::GeminiProvider;
use crate::storage::JsonFileStorage;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Language generated briefs are written in unless configured otherwise.
pub const DEFAULT_LANGUAGE: &str = "Simplified Chinese";

/// Provider request timeout unless configured otherwise.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Runtime configuration.
///
/// Every field has a default, so an empty TOML file or map is valid.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gemini API key. Empty means remote fetches fail with a config error.
    pub api_key: String,

    /// Gemini model name. Default: `gemini-3-flash-preview`
    pub model: String,

    /// REST base URL up to and including `/models`.
    pub base_url: String,

    /// Language all generated text is requested in. Default: `Simplified Chinese`
    pub language: String,

    /// HTTP timeout for one provider call, in seconds. Default: 120
    pub request_timeout_secs: u64,

    /// Cache file path; `~` is expanded. Default: `<data_dir>/cache.json`
    pub cache_file: Option<String>,

    /// Directory for the cache and log files. Default: platform data dir
    pub data_dir: Option<String>,

    /// Log filter directive: `trace`, `debug`, `info`, `warn`, `error`, or a
    /// full `EnvFilter` directive. Default: `"info"`
    pub log_level: Option<String>,

    /// Also log to stderr.
    pub log_to_stderr: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cache_file: None,
            data_dir: None,
            log_level: None,
            log_to_stderr: false,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("cache_file", &self.cache_file)
            .field("data_dir", &self.data_dir)
            .field("log_level", &self.log_level)
            .field("log_to_stderr", &self.log_to_stderr)
            .finish()
    }
}

impl Config {
    /// Parses configuration from a string map.
    ///
    /// # Parsing Rules
    ///
    /// - Blank values count as absent
    /// - `request_timeout_secs`: falls back to 120 on parse error
    /// - `log_to_stderr`: `true`/`1`/`yes` enable it, anything else disables it
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use news_brief::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("model".to_string(), "gemini-2.5-flash".to_string());
    /// map.insert("request_timeout_secs".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.model, "gemini-2.5-flash");
    /// assert_eq!(config.request_timeout_secs, 120);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| {
            map.get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(String::from)
        };
        let defaults = Self::default();

        Self {
            api_key: get("api_key").unwrap_or_default(),
            model: get("model").unwrap_or(defaults.model),
            base_url: get("base_url").unwrap_or(defaults.base_url),
            language: get("language").unwrap_or(defaults.language),
            request_timeout_secs: get("request_timeout_secs")
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            cache_file: get("cache_file"),
            data_dir: get("data_dir"),
            log_level: get("log_level"),
            log_to_stderr: get("log_to_stderr")
                .is_some_and(|s| matches!(s.to_ascii_lowercase().as_str(), "true" | "1" | "yes")),
        }
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`NewsBriefError::Config`] if the text is not valid TOML or a
    /// value has the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| NewsBriefError::Config(format!("invalid config: {e}")))
    }

    /// Reads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Applies overrides from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = get("GEMINI_API_KEY") {
            self.api_key = key;
        }
        if let Some(model) = get("NEWS_BRIEF_MODEL") {
            self.model = model;
        }
        if let Some(path) = get("NEWS_BRIEF_CACHE_FILE") {
            self.cache_file = Some(path);
        }
        if let Some(level) = get("NEWS_BRIEF_LOG") {
            self.log_level = Some(level);
        }
        self
    }

    /// Directory for the cache and log files.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .as_deref()
            .map_or_else(get_data_dir, expand_tilde)
    }

    /// Resolved cache file path.
    #[must_use]
    pub fn cache_path(&self) -> PathBuf {
        self.cache_file
            .as_deref()
            .map_or_else(|| self.data_dir().join(CACHE_FILE_NAME), expand_tilde)
    }

    /// Provider settings derived from this configuration.
    #[must_use]
    pub fn gemini_settings(&self) -> GeminiSettings {
        GeminiSettings {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            language: self.language.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
        }
    }
}

/// Builds an orchestrator backed by Gemini, the JSON cache file and the
/// system clock.
///
/// The cache is loaded before this returns. Tracing is not touched; call
/// [`observability::init_tracing`] first if logs are wanted.
///
/// # Errors
///
/// Returns an error if the cache directory cannot be created or the HTTP
/// client cannot be built.
///
/// # Example
///
/// ```rust,no_run
/// use news_brief::{initialize, Config};
///
/// let orchestrator = initialize(&Config::default())?;
/// println!("{} cached days", orchestrator.cache_stats().days);
/// # Ok::<(), news_brief::NewsBriefError>(())
/// ```
pub fn initialize(config: &Config) -> Result<BriefOrchestrator> {
    tracing::debug!(config = ?config, "initializing news brief");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let storage = Arc::new(JsonFileStorage::new(config.cache_path())?);
    let provider = Arc::new(GeminiProvider::new(config.gemini_settings(), Arc::clone(&clock))?);

    Ok(BriefOrchestrator::new(provider, storage, clock))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_the_default_config() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn toml_overrides_selected_fields() {
        let config = Config::from_toml_str(
            r#"
            api_key = "k"
            request_timeout_secs = 30
            log_to_stderr = true
            "#,
        )
        .unwrap();

        assert_eq!(config.api_key, "k");
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.log_to_stderr);
        assert_eq!(config.model, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn wrong_toml_type_is_a_config_error() {
        let result = Config::from_toml_str("request_timeout_secs = \"soon\"");

        assert!(matches!(result, Err(NewsBriefError::Config(_))));
    }

    #[test]
    fn env_overrides_win_and_blank_values_are_ignored() {
        let env: BTreeMap<&str, &str> = [
            ("GEMINI_API_KEY", "from-env"),
            ("NEWS_BRIEF_MODEL", "  "),
            ("NEWS_BRIEF_LOG", "debug"),
        ]
        .into_iter()
        .collect();

        let config = Config {
            api_key: "from-file".to_string(),
            ..Config::default()
        }
        .with_overrides_from(|key| env.get(key).map(|value| (*value).to_string()));

        assert_eq!(config.api_key, "from-env");
        assert_eq!(config.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn cache_path_defaults_into_data_dir() {
        let config = Config {
            data_dir: Some("/var/lib/news".to_string()),
            ..Config::default()
        };

        assert_eq!(config.cache_path(), PathBuf::from("/var/lib/news/cache.json"));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = Config {
            api_key: "secret".to_string(),
            ..Config::default()
        };

        assert!(!format!("{config:?}").contains("secret"));
    }
}
