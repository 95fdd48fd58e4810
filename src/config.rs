//! Client configuration and the injected user session.
//!
//! Values come from an optional JSON file in the user's config directory,
//! then environment variables, then command-line flags (applied by the
//! binary). Later sources win.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const ENV_API_URL: &str = "POKEMON_SCANNER_API_URL";
pub const ENV_USER_ID: &str = "POKEMON_SCANNER_USER_ID";
pub const ENV_USER_NAME: &str = "POKEMON_SCANNER_USER_NAME";

/// The signed-in user, as handed over by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: None,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Cache catalog lookups on disk
    pub use_card_cache: bool,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 60,
            use_card_cache: true,
            user_id: None,
            user_name: None,
        }
    }
}

impl Config {
    /// Default config file: `<config dir>/pokemon_scanner/config.json`
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pokemon_scanner")
            .join("config.json")
    }

    /// Load from the default file and the process environment
    pub fn load() -> Self {
        let mut config = Self::load_from(&Self::config_path());
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Load from a JSON file, falling back to defaults if missing or invalid
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Config>(&content) {
                Ok(mut config) => {
                    log::info!("Loaded config from {}", path.display());
                    config.api_url = normalize_api_url(&config.api_url);
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse config file, using defaults: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read config file, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Override fields from environment variables, looked up through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_url = normalize_api_url(&url);
        }
        if let Some(id) = lookup(ENV_USER_ID).filter(|v| !v.trim().is_empty()) {
            self.user_id = Some(id.trim().to_string());
        }
        if let Some(name) = lookup(ENV_USER_NAME).filter(|v| !v.trim().is_empty()) {
            self.user_name = Some(name.trim().to_string());
        }
    }

    pub fn set_api_url(&mut self, url: &str) {
        self.api_url = normalize_api_url(url);
    }

    /// The configured session, if a user id is known
    pub fn session(&self) -> Option<Session> {
        self.user_id.as_ref().map(|id| Session {
            user_id: id.clone(),
            name: self.user_name.clone(),
        })
    }
}

/// Trim trailing slashes and route the wildcard bind address to loopback
pub fn normalize_api_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    match Url::parse(trimmed) {
        Ok(mut parsed) if parsed.host_str() == Some("0.0.0.0") => {
            if let Err(e) = parsed.set_host(Some("127.0.0.1")) {
                log::warn!("Could not rewrite host of {}: {}", trimmed, e);
                return trimmed.to_string();
            }
            parsed.as_str().trim_end_matches('/').to_string()
        }
        _ => trimmed.to_string(),
    }
}
