//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client behavior settings
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Candidate agenda URLs, tried in order
    #[serde(default = "defaults::sources")]
    pub sources: Vec<String>,

    /// Snapshot cache settings
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return defaults if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::config("fetcher.user_agent is empty"));
        }
        if self.fetcher.request_timeout_secs == 0 {
            return Err(AppError::config("fetcher.request_timeout_secs must be > 0"));
        }
        if self.fetcher.resource_timeout_secs < self.fetcher.request_timeout_secs {
            return Err(AppError::config(
                "fetcher.resource_timeout_secs must cover the request timeout",
            ));
        }
        if self.fetcher.trusted_hosts.is_empty() {
            return Err(AppError::config("No trusted hosts defined"));
        }
        if self.sources.is_empty() {
            return Err(AppError::config("No agenda sources defined"));
        }
        for source in &self.sources {
            let url = Url::parse(source)
                .map_err(|_| AppError::invalid_url(source.clone()))?;
            let host = url
                .host_str()
                .ok_or_else(|| AppError::invalid_url(source.clone()))?;
            if !self.fetcher.trusted_hosts.iter().any(|h| h == host) {
                return Err(AppError::config(format!(
                    "source host {host} is not in fetcher.trusted_hosts"
                )));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetcher: FetcherConfig::default(),
            sources: defaults::sources(),
            cache: CacheConfig::default(),
        }
    }
}

/// HTTP client behavior settings.
///
/// The defaults emulate a desktop browser session against the agenda
/// host: the site serves an empty page to clients it takes for bots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Accept header
    #[serde(default = "defaults::accept")]
    pub accept: String,

    /// Accept-Language header
    #[serde(default = "defaults::accept_language")]
    pub accept_language: String,

    /// Per-request connect/read timeout in seconds
    #[serde(default = "defaults::request_timeout")]
    pub request_timeout_secs: u64,

    /// Whole-transfer timeout in seconds
    #[serde(default = "defaults::resource_timeout")]
    pub resource_timeout_secs: u64,

    /// Hosts the relaxed certificate handling is pinned to.
    /// Fetching any other host is refused.
    #[serde(default = "defaults::trusted_hosts")]
    pub trusted_hosts: Vec<String>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            accept: defaults::accept(),
            accept_language: defaults::accept_language(),
            request_timeout_secs: defaults::request_timeout(),
            resource_timeout_secs: defaults::resource_timeout(),
            trusted_hosts: defaults::trusted_hosts(),
        }
    }
}

/// Snapshot cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory holding the last-known-good snapshot
    #[serde(default = "defaults::cache_dir")]
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: defaults::cache_dir(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Fetcher defaults, mirroring a desktop Safari session.
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 \
         (KHTML, like Gecko) Version/16.0 Safari/605.1.15"
            .into()
    }
    pub fn accept() -> String {
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".into()
    }
    pub fn accept_language() -> String {
        "nl-NL,nl;q=0.9".into()
    }
    pub fn request_timeout() -> u64 {
        30
    }
    pub fn resource_timeout() -> u64 {
        300
    }
    pub fn trusted_hosts() -> Vec<String> {
        vec!["www.orweja.nl".into(), "orweja.nl".into()]
    }

    // Four spellings of the same logical resource; plain HTTP first
    // because the host's TLS chain has a history of misconfiguration.
    pub fn sources() -> Vec<String> {
        vec![
            "http://www.orweja.nl/agenda/".into(),
            "http://orweja.nl/agenda/".into(),
            "https://orweja.nl/agenda/".into(),
            "https://www.orweja.nl/agenda/".into(),
        ]
    }

    pub fn cache_dir() -> PathBuf {
        PathBuf::from("cache")
    }
}
