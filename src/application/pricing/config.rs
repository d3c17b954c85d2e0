//! Pricing pipeline configuration.

use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::error::ConfigError;

/// Tunables for the fetcher, resolver and cache.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Cache lifetime for pairs with at least one known price.
    #[serde(default = "default_positive_ttl_ms")]
    pub positive_ttl_ms: u64,
    /// Cache lifetime for fully unknown pairs and deadline-cut results.
    #[serde(default = "default_negative_ttl_ms")]
    pub negative_ttl_ms: u64,
    /// Secondary price derived from the primary when the vendor has none.
    /// Zero disables derivation.
    #[serde(default = "default_fallback_multiplier")]
    pub fallback_multiplier: Decimal,
    /// Cap on catalog prints probed during fallback.
    #[serde(default = "default_max_fallback_prints")]
    pub max_fallback_prints: usize,
    /// Per-attempt catalog timeout.
    #[serde(default = "default_catalog_timeout_ms")]
    pub catalog_timeout_ms: u64,
    /// Per-attempt secondary timeout.
    #[serde(default = "default_secondary_timeout_ms")]
    pub secondary_timeout_ms: u64,
    /// Total time one key may spend resolving.
    #[serde(default = "default_resolver_deadline_ms")]
    pub resolver_deadline_ms: u64,
    /// LRU cap on cached pairs. Zero means unbounded.
    #[serde(default = "default_max_cache_entries")]
    pub max_cache_entries: usize,
}

impl PricingConfig {
    #[must_use]
    pub fn positive_ttl(&self) -> Duration {
        Duration::from_millis(self.positive_ttl_ms)
    }

    #[must_use]
    pub fn negative_ttl(&self) -> Duration {
        Duration::from_millis(self.negative_ttl_ms)
    }

    #[must_use]
    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_millis(self.catalog_timeout_ms)
    }

    #[must_use]
    pub fn secondary_timeout(&self) -> Duration {
        Duration::from_millis(self.secondary_timeout_ms)
    }

    #[must_use]
    pub fn resolver_deadline(&self) -> Duration {
        Duration::from_millis(self.resolver_deadline_ms)
    }

    /// The derivation multiplier, or `None` when derivation is disabled.
    #[must_use]
    pub fn multiplier(&self) -> Option<Decimal> {
        (self.fallback_multiplier > Decimal::ZERO).then_some(self.fallback_multiplier)
    }

    /// Reject values the pipeline cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fallback_multiplier.is_sign_negative() && !self.fallback_multiplier.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "fallback_multiplier",
                reason: "must be zero (disabled) or positive".into(),
            });
        }
        if self.positive_ttl_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "positive_ttl_ms",
                reason: "must be greater than 0".into(),
            });
        }
        if self.negative_ttl_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "negative_ttl_ms",
                reason: "must be greater than 0".into(),
            });
        }
        if self.negative_ttl_ms > self.positive_ttl_ms {
            return Err(ConfigError::InvalidValue {
                field: "negative_ttl_ms",
                reason: "must not exceed positive_ttl_ms".into(),
            });
        }
        for (field, value) in [
            ("catalog_timeout_ms", self.catalog_timeout_ms),
            ("secondary_timeout_ms", self.secondary_timeout_ms),
            ("resolver_deadline_ms", self.resolver_deadline_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be greater than 0".into(),
                });
            }
        }
        Ok(())
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            positive_ttl_ms: default_positive_ttl_ms(),
            negative_ttl_ms: default_negative_ttl_ms(),
            fallback_multiplier: default_fallback_multiplier(),
            max_fallback_prints: default_max_fallback_prints(),
            catalog_timeout_ms: default_catalog_timeout_ms(),
            secondary_timeout_ms: default_secondary_timeout_ms(),
            resolver_deadline_ms: default_resolver_deadline_ms(),
            max_cache_entries: default_max_cache_entries(),
        }
    }
}

const fn default_positive_ttl_ms() -> u64 {
    12 * 60 * 60 * 1000
}

const fn default_negative_ttl_ms() -> u64 {
    5 * 60 * 1000
}

fn default_fallback_multiplier() -> Decimal {
    dec!(1.15)
}

const fn default_max_fallback_prints() -> usize {
    10
}

const fn default_catalog_timeout_ms() -> u64 {
    5000
}

const fn default_secondary_timeout_ms() -> u64 {
    3000
}

const fn default_resolver_deadline_ms() -> u64 {
    15_000
}

const fn default_max_cache_entries() -> usize {
    10_000
}
