//! Single-shot price lookups against the catalog and secondary sources.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::config::PricingConfig;
use crate::core::domain::{sort_newest_first, Price, PricePair, PrintRecord};
use crate::error::SourceError;
use crate::port::{CatalogSource, SecondarySource};

/// What one fetch observed, before any cross-print decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// Pair built from this fetch alone, derivation applied.
    pub pair: PricePair,
    /// Primary price as reported by the catalog.
    pub primary: Price,
    /// Secondary price as reported by the vendor, never derived.
    pub secondary: Price,
    /// Some source answered `RateLimited`.
    pub rate_limited: bool,
    /// Every source that was called failed as unavailable or timed out.
    pub unavailable: bool,
}

/// Looks up one print without falling back across prints and without caching.
///
/// Source failures never escape: they become [`Price::Unknown`] components
/// and are summarized in the [`FetchOutcome`] flags.
pub struct Fetcher {
    catalog: Arc<dyn CatalogSource>,
    secondary: Arc<dyn SecondarySource>,
    multiplier: Option<Decimal>,
    catalog_timeout: Duration,
    secondary_timeout: Duration,
}

impl Fetcher {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        secondary: Arc<dyn SecondarySource>,
        config: &PricingConfig,
    ) -> Self {
        Self {
            catalog,
            secondary,
            multiplier: config.multiplier(),
            catalog_timeout: config.catalog_timeout(),
            secondary_timeout: config.secondary_timeout(),
        }
    }

    /// Query the catalog print and the secondary price for `(name, set)`
    /// concurrently.
    pub async fn fetch(&self, name: &str, set: &str) -> FetchOutcome {
        let (print, secondary) = tokio::join!(
            self.catalog_print(name, set),
            self.secondary_price(name, set)
        );

        let primary = match &print {
            Ok(record) => record.primary_price,
            Err(_) => Price::Unknown,
        };
        let secondary_price = secondary.unwrap_or(Price::Unknown);

        let failures = [print.as_ref().err().copied(), secondary.err()];
        self.outcome(primary, secondary_price, &failures)
    }

    /// Probe the secondary source for an already-enumerated print.
    ///
    /// The primary price comes from the record itself, so no catalog call is
    /// made.
    pub async fn fetch_print(&self, print: &PrintRecord) -> FetchOutcome {
        let secondary = self.secondary_price(&print.name, &print.set).await;
        let secondary_price = secondary.unwrap_or(Price::Unknown);
        self.outcome(print.primary_price, secondary_price, &[secondary.err()])
    }

    /// All prints of `name`, newest first.
    pub async fn prints(&self, name: &str) -> Result<Vec<PrintRecord>, SourceError> {
        let mut prints = match timeout(self.catalog_timeout, self.catalog.get_prints(name)).await
        {
            Ok(Ok(prints)) => prints,
            Ok(Err(SourceError::NotFound)) => Vec::new(),
            Ok(Err(err)) => {
                warn!(
                    source = self.catalog.source_name(),
                    name,
                    error = %err,
                    "Print enumeration failed"
                );
                return Err(err);
            }
            Err(_) => {
                warn!(source = self.catalog.source_name(), name, "Print enumeration timed out");
                return Err(SourceError::Timeout);
            }
        };
        sort_newest_first(&mut prints);
        debug!(name, count = prints.len(), "Enumerated prints");
        Ok(prints)
    }

    /// The configured derivation multiplier, if derivation is enabled.
    #[must_use]
    pub const fn multiplier(&self) -> Option<Decimal> {
        self.multiplier
    }

    async fn catalog_print(&self, name: &str, set: &str) -> Result<PrintRecord, SourceError> {
        let result = timeout(self.catalog_timeout, self.catalog.get_print(name, set))
            .await
            .unwrap_or(Err(SourceError::Timeout));
        if let Err(err) = &result {
            debug!(
                source = self.catalog.source_name(),
                name,
                set,
                error = %err,
                "Catalog lookup failed"
            );
        }
        result
    }

    async fn secondary_price(&self, name: &str, set: &str) -> Result<Price, SourceError> {
        let result = timeout(self.secondary_timeout, self.secondary.get_secondary(name, set))
            .await
            .unwrap_or(Err(SourceError::Timeout));
        if let Err(err) = &result {
            debug!(
                source = self.secondary.source_name(),
                name,
                set,
                error = %err,
                "Secondary lookup failed"
            );
        }
        result
    }

    fn outcome(
        &self,
        primary: Price,
        secondary: Price,
        failures: &[Option<SourceError>],
    ) -> FetchOutcome {
        let pair = match (primary, secondary) {
            (Price::Money(tcg), Price::Money(ck)) => PricePair::direct(tcg, ck),
            (tcg, _) => PricePair::from_primary(tcg, self.multiplier),
        };

        let rate_limited = failures
            .iter()
            .any(|f| matches!(f, Some(SourceError::RateLimited)));
        let unavailable = failures.iter().all(|f| {
            matches!(
                f,
                Some(SourceError::Unavailable | SourceError::Timeout)
            )
        });

        FetchOutcome {
            pair,
            primary,
            secondary,
            rate_limited,
            unavailable,
        }
    }
}
