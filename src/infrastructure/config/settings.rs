//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Configuration is loaded from a TOML file, with environment variable
//! overrides for the source endpoints.
//!
//! # Example
//!
//! ```no_run
//! use bigdeck::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_or_default("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::logging::LoggingConfig;
use crate::adapter::outbound::http::parse_base_url;
use crate::adapter::outbound::proxy::SecondaryConfig;
use crate::adapter::outbound::scryfall::CatalogConfig;
use crate::application::pricing::PricingConfig;
use crate::error::{ConfigError, Result};

/// Overrides `[catalog] base_url`.
pub const CATALOG_URL_ENV: &str = "BIGDECK_CATALOG_URL";
/// Overrides `[secondary] base_url`.
pub const PRICE_PROXY_URL_ENV: &str = "BIGDECK_PRICE_PROXY_URL";

/// Main application configuration.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Cache lifetimes, timeouts and fallback tuning.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Card catalog endpoint.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Secondary vendor price proxy endpoint.
    #[serde(default)]
    pub secondary: SecondaryConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content, applying environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        Self::parse_with_env(content, |key| std::env::var(key).ok())
    }

    /// Like [`Config::parse_toml`], reading overrides through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_with_env<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load configuration from `path`, or use the defaults when the file does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or is invalid.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "Config file not found, using defaults");
            Self::parse_toml("")
        }
    }

    /// Initialize the global tracing subscriber.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(CATALOG_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.catalog.base_url = url;
        }
        if let Some(url) = lookup(PRICE_PROXY_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.secondary.base_url = url;
        }
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        self.pricing.validate()?;

        parse_base_url("catalog.base_url", &self.catalog.base_url)?;
        parse_base_url("secondary.base_url", &self.secondary.base_url)?;

        if self.catalog.retry_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "catalog.retry_max_attempts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.secondary.retry_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "secondary.retry_max_attempts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "logging.level",
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::infrastructure::config::logging::LogFormat;
    use rust_decimal_macros::dec;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::parse_with_env("", no_env).unwrap();
        assert_eq!(config.catalog.base_url, "https://api.scryfall.com");
        assert_eq!(config.secondary.base_url, "http://localhost:3000");
        assert_eq!(config.catalog.retry_max_attempts, 2);
        assert_eq!(config.secondary.retry_max_attempts, 1);
        assert_eq!(config.pricing.fallback_multiplier, dec!(1.15));
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn sections_override_defaults() {
        let toml = r#"
            [pricing]
            negative_ttl_ms = 60000
            fallback_multiplier = 0

            [secondary]
            base_url = "http://proxy.internal:8080"

            [logging]
            level = "debug"
            format = "json"
        "#;
        let config = Config::parse_with_env(toml, no_env).unwrap();
        assert_eq!(config.pricing.negative_ttl_ms, 60_000);
        assert_eq!(config.pricing.multiplier(), None);
        assert_eq!(config.secondary.base_url, "http://proxy.internal:8080");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn environment_overrides_endpoints() {
        let config = Config::parse_with_env("", |key| match key {
            CATALOG_URL_ENV => Some("http://127.0.0.1:9000".into()),
            PRICE_PROXY_URL_ENV => Some("  ".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.catalog.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.secondary.base_url, "http://localhost:3000");
    }

    #[test]
    fn rejects_invalid_values() {
        let bad_url = Config::parse_with_env("[catalog]\nbase_url = \"nope\"", no_env);
        assert!(matches!(
            bad_url,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "catalog.base_url",
                ..
            }))
        ));

        let no_attempts = Config::parse_with_env("[secondary]\nretry_max_attempts = 0", no_env);
        assert!(no_attempts.is_err());

        let malformed = Config::parse_with_env("[pricing\n", no_env);
        assert!(matches!(malformed, Err(Error::Config(ConfigError::Parse(_)))));
    }
}
