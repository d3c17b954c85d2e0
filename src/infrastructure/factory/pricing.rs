//! Price service factory.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::adapter::outbound::http::HttpPolicy;
use crate::adapter::outbound::proxy::PriceProxyClient;
use crate::adapter::outbound::scryfall::ScryfallClient;
use crate::application::pricing::PriceService;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::{CatalogSource, InventorySets, NoInventory, SecondarySource};

/// HTTP policy for the catalog adapter.
#[must_use]
pub fn catalog_policy(config: &Config) -> HttpPolicy {
    HttpPolicy {
        timeout: config.pricing.catalog_timeout(),
        connect_timeout: Duration::from_millis(config.catalog.connect_timeout_ms),
        retry_max_attempts: config.catalog.retry_max_attempts,
        retry_backoff: Duration::from_millis(config.catalog.retry_backoff_ms),
    }
}

/// HTTP policy for the secondary price proxy adapter.
#[must_use]
pub fn secondary_policy(config: &Config) -> HttpPolicy {
    HttpPolicy {
        timeout: config.pricing.secondary_timeout(),
        connect_timeout: Duration::from_millis(config.secondary.connect_timeout_ms),
        retry_max_attempts: config.secondary.retry_max_attempts,
        retry_backoff: Duration::from_millis(config.secondary.retry_backoff_ms),
    }
}

/// Build the catalog source from configuration.
///
/// # Errors
///
/// Returns an error if the catalog base URL is invalid.
#[allow(clippy::result_large_err)]
pub fn build_catalog(config: &Config) -> Result<Arc<dyn CatalogSource>> {
    let client = ScryfallClient::new(&config.catalog.base_url, catalog_policy(config))?;
    Ok(Arc::new(client))
}

/// Build the secondary price source from configuration.
///
/// # Errors
///
/// Returns an error if the proxy base URL is invalid.
#[allow(clippy::result_large_err)]
pub fn build_secondary(config: &Config) -> Result<Arc<dyn SecondarySource>> {
    let client = PriceProxyClient::new(&config.secondary.base_url, secondary_policy(config))?;
    Ok(Arc::new(client))
}

/// Build a [`PriceService`] backed by the HTTP adapters.
///
/// The CLI has no collection inventory, so set-less lines resolve through
/// the wildcard key unless `inventory` is supplied.
///
/// # Errors
///
/// Returns an error if either adapter cannot be constructed.
#[allow(clippy::result_large_err)]
pub fn build_price_service(
    config: &Config,
    inventory: Option<Arc<dyn InventorySets>>,
) -> Result<PriceService> {
    let catalog = build_catalog(config)?;
    let secondary = build_secondary(config)?;
    let inventory = inventory.unwrap_or_else(|| Arc::new(NoInventory));

    info!(
        catalog = catalog.source_name(),
        catalog_url = %config.catalog.base_url,
        secondary = secondary.source_name(),
        secondary_url = %config.secondary.base_url,
        "Price sources initialized"
    );
    Ok(PriceService::new(
        catalog,
        secondary,
        inventory,
        config.pricing.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policies_follow_pricing_timeouts() {
        let config = Config::default();
        let catalog = catalog_policy(&config);
        assert_eq!(catalog.timeout, Duration::from_secs(5));
        assert_eq!(catalog.retry_max_attempts, 2);
        assert_eq!(catalog.retry_backoff, Duration::from_millis(100));

        let secondary = secondary_policy(&config);
        assert_eq!(secondary.timeout, Duration::from_secs(3));
        assert_eq!(secondary.retry_max_attempts, 1);
        assert!(secondary.retry_backoff.is_zero());
    }

    #[tokio::test]
    async fn builds_service_from_defaults() {
        let service = build_price_service(&Config::default(), None).unwrap();
        assert_eq!(service.resolver().pending(), 0);
    }
}
