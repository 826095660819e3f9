//! Layered configuration.
//!
//! Sources, highest priority first:
//! 1. Environment variables prefixed `RECSYNC_` (e.g. `RECSYNC_API_BASE_URL`)
//! 2. `./recsync.toml`
//! 3. `<config dir>/recsync/config.toml`
//! 4. Built-in defaults

use crate::domain::error::DomainError;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RecSyncConfig {
    pub api_base_url: String,
    pub timeout_secs: u64,
    pub page_size: usize,
    pub search_debounce_ms: u64,
    pub scroll_margin_px: f64,
    pub cache_ttl_secs: u64,
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
    /// A token given here is used instead of stored credentials.
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for RecSyncConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api/v1".into(),
            timeout_secs: 120,
            page_size: 10,
            search_debounce_ms: 300,
            scroll_margin_px: 400.0,
            cache_ttl_secs: 300,
            credentials_path: None,
            token: None,
        }
    }
}

impl RecSyncConfig {
    pub fn load() -> Result<Self, DomainError> {
        let config: Self = Self::figment()
            .extract()
            .map_err(|e| DomainError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `.env` from the working directory first, if there is one.
    pub fn load_with_dotenv() -> Result<Self, DomainError> {
        if let Err(error) = dotenvy::dotenv() {
            if !error.not_found() {
                tracing::warn!(%error, "failed to read .env");
            }
        }
        Self::load()
    }

    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(global) = dirs::config_dir().map(|d| d.join("recsync").join("config.toml")) {
            if global.exists() {
                figment = figment.merge(Toml::file(global));
            }
        }
        figment
            .merge(Toml::file("recsync.toml"))
            .merge(Env::prefixed("RECSYNC_"))
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.api_base_url.trim().is_empty() {
            return Err(DomainError::Config("api_base_url must not be empty".into()));
        }
        if self.page_size == 0 {
            return Err(DomainError::Config("page_size must be greater than zero".into()));
        }
        if self.timeout_secs == 0 {
            return Err(DomainError::Config("timeout_secs must be greater than zero".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }
}
