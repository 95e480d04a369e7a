//! Process-wide GitHub settings. Read once, never mutated.

use std::time::Duration;

use apply_core::GITHUB_HOST;
use chrono::{FixedOffset, Offset, Utc};
use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?} is not a whole number of seconds")]
    InvalidTimeout { var: &'static str, value: String },
    #[error("invalid {var}: {value:?} is not a UTC offset like +09:00")]
    InvalidOffset { var: &'static str, value: String },
    #[error("invalid web host {0:?}")]
    InvalidHost(String),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// REST API root, without trailing slash.
    pub api_base_url: String,
    /// Bearer token. Empty means anonymous.
    pub access_key: String,
    pub request_timeout: Duration,
    /// Offset in which zone-naive deadlines are interpreted.
    pub deadline_offset: FixedOffset,
    /// Host that submission URLs must point at.
    pub web_host: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            access_key: String::new(),
            request_timeout: DEFAULT_TIMEOUT,
            deadline_offset: utc(),
            web_host: GITHUB_HOST.to_string(),
        }
    }
}

impl GitHubConfig {
    /// Read `GITHUB_API_URL`, `GITHUB_TOKEN`, `GITHUB_TIMEOUT_SECS`,
    /// `APPLY_DEADLINE_OFFSET` and `GITHUB_WEB_HOST`. Unset variables keep
    /// their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup("GITHUB_API_URL") {
            config = config.with_api_base_url(&url);
        }
        if let Some(token) = lookup("GITHUB_TOKEN") {
            config.access_key = token;
        }
        if let Some(secs) = lookup("GITHUB_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| ConfigError::InvalidTimeout {
                var: "GITHUB_TIMEOUT_SECS",
                value: secs.clone(),
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(offset) = lookup("APPLY_DEADLINE_OFFSET") {
            config.deadline_offset = parse_offset(&offset).ok_or(ConfigError::InvalidOffset {
                var: "APPLY_DEADLINE_OFFSET",
                value: offset.clone(),
            })?;
        }
        if let Some(host) = lookup("GITHUB_WEB_HOST") {
            config.web_host = host;
        }
        Ok(config)
    }

    pub fn with_api_base_url(mut self, url: &str) -> Self {
        self.api_base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_access_key(mut self, token: impl Into<String>) -> Self {
        self.access_key = token.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_deadline_offset(mut self, offset: FixedOffset) -> Self {
        self.deadline_offset = offset;
        self
    }

    pub fn with_web_host(mut self, host: impl Into<String>) -> Self {
        self.web_host = host.into();
        self
    }
}

/// Parse `+09:00`, `-0330` or `Z`.
pub fn parse_offset(s: &str) -> Option<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return Some(utc());
    }
    s.parse().ok()
}

fn utc() -> FixedOffset {
    Utc.fix()
}
