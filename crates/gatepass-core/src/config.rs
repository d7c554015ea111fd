//! Application configuration management.
//!
//! This module handles loading and saving the client configuration: the
//! service base URL, request timeout, which token backend to use, and the
//! last used username.
//!
//! Configuration is stored at `~/.config/gatepass/config.json`. The
//! `GATEPASS_API_URL` and `GATEPASS_TOKEN_BACKEND` environment variables
//! override the file.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::{FileTokenStore, KeyringTokenStore, StoreError, TokenStore};

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "gatepass";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Service used when nothing is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const API_URL_ENV: &str = "GATEPASS_API_URL";
pub const TOKEN_BACKEND_ENV: &str = "GATEPASS_TOKEN_BACKEND";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not find {0} directory")]
    NoDirectory(&'static str),

    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown token backend '{0}' (expected 'file' or 'keyring')")]
    UnknownBackend(String),

    #[error("Failed to open token store: {0}")]
    Store(#[from] StoreError),
}

/// Where the bearer token is persisted between runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    #[default]
    File,
    Keyring,
}

impl FromStr for TokenBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(TokenBackend::File),
            "keyring" => Ok(TokenBackend::Keyring),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub token_backend: TokenBackend,
    #[serde(default)]
    pub last_username: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_timeout(),
            token_backend: TokenBackend::default(),
            last_username: None,
        }
    }
}

impl Config {
    /// Load from the config file, then apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };
        config.apply_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(TOKEN_BACKEND_ENV).ok(),
        )?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn apply_overrides(
        &mut self,
        api_url: Option<String>,
        backend: Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(backend) = backend.filter(|b| !b.trim().is_empty()) {
            self.token_backend = backend.parse()?;
        }
        Ok(())
    }

    /// Base URL without trailing slashes, ready to have a path appended
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim().trim_end_matches('/')
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoDirectory("config"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf, ConfigError> {
        let cache_dir = dirs::cache_dir().ok_or(ConfigError::NoDirectory("cache"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Build the token store selected by `token_backend`
    pub fn token_store(&self) -> Result<Arc<dyn TokenStore>, ConfigError> {
        let store: Arc<dyn TokenStore> = match self.token_backend {
            TokenBackend::File => Arc::new(FileTokenStore::new(self.cache_dir()?)),
            TokenBackend::Keyring => Arc::new(KeyringTokenStore::new()?),
        };
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url(), "http://localhost:8080");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.token_backend, TokenBackend::File);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"api_base_url": "https://tickets.example.com/"}"#).unwrap();
        assert_eq!(config.base_url(), "https://tickets.example.com");
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.last_username, None);
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(Some("http://10.0.0.5:8080//".into()), Some("Keyring".into()))
            .unwrap();
        assert_eq!(config.base_url(), "http://10.0.0.5:8080");
        assert_eq!(config.token_backend, TokenBackend::Keyring);

        // Blank values are ignored
        config.apply_overrides(Some(" ".into()), Some(String::new())).unwrap();
        assert_eq!(config.base_url(), "http://10.0.0.5:8080");
    }

    #[test]
    fn test_unknown_backend() {
        let mut config = Config::default();
        let err = config.apply_overrides(None, Some("sqlite".into())).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownBackend(ref b) if b == "sqlite"));
    }

    #[test]
    fn test_backend_serializes_lowercase() {
        let json = serde_json::to_string(&TokenBackend::Keyring).unwrap();
        assert_eq!(json, r#""keyring""#);
    }
}
