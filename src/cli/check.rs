//! Configuration diagnostics.

use std::path::Path;

use serde_json::json;

use super::output;
use crate::error::Result;
use crate::infrastructure::config::settings::{Config, CATALOG_URL_ENV, PRICE_PROXY_URL_ENV};

/// Report the effective configuration loaded from `path`.
pub fn execute_config(path: &Path, config: &Config) -> Result<()> {
    let from_file = path.exists();

    if output::is_json() {
        output::json_output(json!({
            "command": "check.config",
            "path": path.display().to_string(),
            "from_file": from_file,
            "catalog_url": config.catalog.base_url,
            "secondary_url": config.secondary.base_url,
            "positive_ttl_ms": config.pricing.positive_ttl_ms,
            "negative_ttl_ms": config.pricing.negative_ttl_ms,
            "fallback_multiplier": config.pricing.fallback_multiplier.to_string(),
            "max_fallback_prints": config.pricing.max_fallback_prints,
            "valid": true,
        }));
        return Ok(());
    }

    output::section(&format!("Configuration: {}", path.display()));
    if from_file {
        output::success("Configuration file is valid");
    } else {
        output::warning("Configuration file not found, using defaults");
    }

    output::field("Catalog", &config.catalog.base_url);
    output::field("Price proxy", &config.secondary.base_url);
    output::field(
        "Cache TTL",
        format!(
            "{}s positive / {}s negative",
            config.pricing.positive_ttl().as_secs(),
            config.pricing.negative_ttl().as_secs()
        ),
    );
    match config.pricing.multiplier() {
        Some(multiplier) => output::field("Derivation", format!("x{multiplier}")),
        None => output::field("Derivation", "disabled"),
    }
    output::field("Fallback", format!("{} prints", config.pricing.max_fallback_prints));

    for var in [CATALOG_URL_ENV, PRICE_PROXY_URL_ENV] {
        if std::env::var(var).is_ok_and(|v| !v.trim().is_empty()) {
            output::field("Override", var);
        }
    }
    Ok(())
}
