//! Scryfall catalog configuration.

use serde::Deserialize;

/// Catalog adapter settings. The per-attempt timeout lives in
/// [`PricingConfig`](crate::application::pricing::PricingConfig).
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Maximum number of attempts for transient failures.
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,
    /// Backoff between retries in milliseconds.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_base_url() -> String {
    "https://api.scryfall.com".into()
}

const fn default_connect_timeout_ms() -> u64 {
    2000
}

const fn default_retry_max_attempts() -> u32 {
    2
}

const fn default_retry_backoff_ms() -> u64 {
    100
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_ms: default_connect_timeout_ms(),
            retry_max_attempts: default_retry_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}
