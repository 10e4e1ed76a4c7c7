//! Storefront configuration.
//!
//! Every field has a default; the browser layer may override any subset
//! from an inline JSON block.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid storefront config: {0}")]
    Invalid(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorefrontConfig {
    pub api_base: String,
    pub auth_header: String,
    pub search_debounce_ms: u32,
    pub min_search_len: usize,
    pub currency: String,
    /// Image used when a product has no photo. `{size}` is replaced with
    /// the slot dimensions, e.g. `200x200`.
    pub placeholder_image: String,
    pub log_level: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_base: "/api".to_owned(),
            auth_header: ms_client::AUTH_HEADER.to_owned(),
            search_debounce_ms: 300,
            min_search_len: 2,
            currency: "₽".to_owned(),
            placeholder_image: "https://via.placeholder.com/{size}?text=No+Image".to_owned(),
            log_level: "info".to_owned(),
        }
    }
}

impl StorefrontConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(u64::from(self.search_debounce_ms))
    }

    /// Absolute API base. Relative bases are joined onto `origin`.
    pub fn resolve_api_base(&self, origin: &str) -> String {
        let base = self.api_base.trim();
        if base.starts_with("http://") || base.starts_with("https://") {
            return base.trim_end_matches('/').to_owned();
        }
        format!(
            "{}/{}",
            origin.trim_end_matches('/'),
            base.trim_matches('/')
        )
    }
}
