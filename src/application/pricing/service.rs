//! Inbound pricing API used by the UI and the CLI.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::aggregator::Aggregator;
use super::config::PricingConfig;
use super::resolver::Resolver;
use crate::core::domain::{parse_decklist, CardKey, ContainerItem, LineItem, PricePair, PriceReport};
use crate::error::Result;
use crate::port::{CatalogSource, InventorySets, SecondarySource};

/// Facade over the resolver and aggregator.
#[derive(Clone)]
pub struct PriceService {
    resolver: Resolver,
    aggregator: Aggregator,
}

impl PriceService {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        secondary: Arc<dyn SecondarySource>,
        inventory: Arc<dyn InventorySets>,
        config: PricingConfig,
    ) -> Self {
        let resolver = Resolver::new(catalog, secondary, config);
        let aggregator = Aggregator::new(resolver.clone(), inventory);
        Self {
            resolver,
            aggregator,
        }
    }

    /// Resolve one card. An empty set means any print.
    pub async fn resolve(&self, name: &str, set: &str) -> PricePair {
        self.resolver.resolve(&CardKey::new(name, set)).await
    }

    /// Resolve one card, giving up with [`crate::error::Error::Cancelled`]
    /// when `cancel` fires.
    pub async fn resolve_with_cancel(
        &self,
        name: &str,
        set: &str,
        cancel: &CancellationToken,
    ) -> Result<PricePair> {
        self.resolver
            .resolve_with_cancel(&CardKey::new(name, set), cancel)
            .await
    }

    /// Price decklist lines.
    pub async fn price_decklist(&self, lines: Vec<LineItem>) -> PriceReport {
        self.aggregator.price_lines(lines).await
    }

    /// Parse decklist text and price it.
    pub async fn price_decklist_text(&self, text: &str) -> PriceReport {
        self.price_decklist(parse_decklist(text)).await
    }

    /// Price the contents of a container. Invalid items are skipped.
    pub async fn price_container(&self, items: Vec<ContainerItem>) -> PriceReport {
        let lines = items
            .into_iter()
            .filter_map(Option::<LineItem>::from)
            .collect();
        self.aggregator.price_lines(lines).await
    }

    /// Drop one cached price.
    pub fn invalidate(&self, name: &str, set: &str) {
        self.resolver.invalidate(&CardKey::new(name, set));
    }

    /// Drop every cached price ("Refresh Price Cache").
    pub fn invalidate_all(&self) {
        self.resolver.invalidate_all();
    }

    #[must_use]
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }
}
