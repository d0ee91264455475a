//! Configuration management for watchany
//!
//! Handles config file loading and access token lookup.
//! Config is stored at ~/.config/watchany/config.toml

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::tmdb::{DEFAULT_BASE_URL, DEFAULT_LANGUAGE, DEFAULT_TIMEOUT};

/// Environment variable that overrides the configured access token
pub const TOKEN_ENV: &str = "TMDB_ACCESS_TOKEN";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// TMDB API read access token (v4 bearer token)
    pub access_token: Option<String>,
    /// Response language, e.g. "en-US"
    pub language: Option<String>,
    /// API base URL override
    pub base_url: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Get config file path (~/.config/watchany/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("watchany").join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| Self::load_from(&p).ok())
            .unwrap_or_default()
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Access token with fallback chain:
    /// 1. Environment variable TMDB_ACCESS_TOKEN
    /// 2. Token from config file
    pub fn access_token(&self) -> Result<String> {
        self.resolve_token(std::env::var(TOKEN_ENV).ok())
    }

    fn resolve_token(&self, from_env: Option<String>) -> Result<String> {
        from_env
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.access_token.clone())
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No access token configured. Set {} or add access_token to the config file",
                    TOKEN_ENV
                )
            })
    }

    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.access_token.is_none());
        assert_eq!(config.language(), "en-US");
        assert_eq!(config.base_url(), "https://api.themoviedb.org/3");
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_env_token_wins() {
        let config = Config {
            access_token: Some("from-file".into()),
            ..Default::default()
        };
        assert_eq!(config.resolve_token(Some("from-env".into())).unwrap(), "from-env");
        assert_eq!(config.resolve_token(None).unwrap(), "from-file");
        assert_eq!(config.resolve_token(Some("  ".into())).unwrap(), "from-file");
    }

    #[test]
    fn test_missing_token_is_error() {
        let config = Config::default();
        let err = config.resolve_token(None).unwrap_err();
        assert!(err.to_string().contains(TOKEN_ENV));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "access_token = \"abc\"\nlanguage = \"nl-NL\"\ntimeout_secs = 5\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(
            config,
            Config {
                access_token: Some("abc".into()),
                language: Some("nl-NL".into()),
                base_url: None,
                timeout_secs: Some(5),
            }
        );
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        assert!(Config::load_from(&path).is_err());
        assert!(Config::load_from(&dir.path().join("missing.toml")).is_err());
    }
}
