//! Client configuration parsed from environment variables.

use std::path::PathBuf;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SESSION_FILE: &str = ".authgate_session.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeouts: Timeouts,
    pub session_file: PathBuf,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `AUTH_API_BASE_URL`: default `http://localhost:8000/api`
    /// - `AUTH_REQUEST_TIMEOUT_SECS`: default 30
    /// - `AUTH_CONNECT_TIMEOUT_SECS`: default 10
    /// - `AUTH_SESSION_FILE`: default `.authgate_session.json`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the base URL is not http(s).
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(
            &std::env::var("AUTH_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
        )?;
        let timeouts = Timeouts {
            request_secs: env_parse_u64("AUTH_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("AUTH_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let session_file = std::env::var("AUTH_SESSION_FILE")
            .map_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);

        Ok(Self { base_url, timeouts, session_file })
    }

    /// Config pointing at `base_url` with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the base URL is not http(s).
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            timeouts: Timeouts::default(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        })
    }
}

/// Trim whitespace and trailing slashes, and require an http(s) scheme.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidBaseUrl`] for any other scheme or an empty host.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let rest = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .ok_or_else(|| ConfigError::InvalidBaseUrl(raw.to_string()))?;
    if rest.is_empty() {
        return Err(ConfigError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
