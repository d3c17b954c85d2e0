//! Price proxy configuration.

use serde::Deserialize;

/// Secondary price proxy settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SecondaryConfig {
    /// Proxy base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,
    #[serde(default)]
    pub retry_backoff_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000".into()
}

const fn default_connect_timeout_ms() -> u64 {
    1000
}

const fn default_retry_max_attempts() -> u32 {
    1
}

impl Default for SecondaryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_ms: default_connect_timeout_ms(),
            retry_max_attempts: default_retry_max_attempts(),
            retry_backoff_ms: 0,
        }
    }
}
