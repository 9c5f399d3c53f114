//! Configuration parsing and validation.
//!
//! feedscan reads a TOML file (default `./config/feedscan.toml`). Every
//! section is optional; missing keys take the defaults below.
//!
//! ```toml
//! [feeds]
//! path = "data/data.json"
//!
//! [search]
//! default_term = "中国"
//! timeout_secs = 30
//! channel_capacity = 64
//!
//! [http]
//! timeout_secs = 10
//! user_agent = "feedscan/0.1"
//!
//! [server]
//! bind = "127.0.0.1:8080"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub feeds: FeedsConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedsConfig {
    /// JSON file holding the feed list.
    #[serde(default = "default_feeds_path")]
    pub path: PathBuf,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            path: default_feeds_path(),
        }
    }
}

fn default_feeds_path() -> PathBuf {
    PathBuf::from("data/data.json")
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Term used by `feedscan search` when none is given.
    #[serde(default = "default_term")]
    pub default_term: String,
    /// Upper bound on one search; `0` disables it.
    #[serde(default = "default_search_timeout_secs")]
    pub timeout_secs: u64,
    /// Capacity of the match channel shared by all feed tasks.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_term: default_term(),
            timeout_secs: default_search_timeout_secs(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl SearchConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

fn default_term() -> String {
    "中国".to_string()
}
fn default_search_timeout_secs() -> u64 {
    30
}
fn default_channel_capacity() -> usize {
    64
}

/// Settings for the HTTP client used to fetch feeds.
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_http_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_http_timeout_secs() -> u64 {
    10
}
fn default_user_agent() -> String {
    format!("feedscan/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

impl Config {
    /// All defaults; used when no config file exists.
    pub fn minimal() -> Self {
        Self::default()
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to [`Config::minimal`].
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        Ok(Config::minimal())
    }
}

fn validate(config: &Config) -> Result<()> {
    if config.search.channel_capacity == 0 {
        anyhow::bail!("search.channel_capacity must be > 0");
    }
    if config.http.timeout_secs == 0 {
        anyhow::bail!("http.timeout_secs must be > 0");
    }
    if config.http.user_agent.trim().is_empty() {
        anyhow::bail!("http.user_agent must not be empty");
    }
    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }
    Ok(())
}
