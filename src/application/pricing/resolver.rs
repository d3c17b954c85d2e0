//! Cross-source price resolution.
//!
//! The resolver is the caching boundary of the pipeline. A lookup runs:
//!
//! 1. fresh cache entry, if any
//! 2. the in-flight lookup for the same key, if any
//! 3. the requested print (specific set only)
//! 4. other prints of the card, newest first, until the secondary vendor
//!    quotes one directly
//! 5. derivation from the best primary price seen
//!
//! and caches the result with the positive TTL, or the negative TTL when
//! nothing was priced or the per-key deadline cut the search short.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::FutureExt;
use tokio::time::{timeout_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::coalescer::{Coalescer, Flight};
use super::config::PricingConfig;
use super::fetcher::{FetchOutcome, Fetcher};
use crate::core::cache::PriceCache;
use crate::core::domain::{CardKey, Money, Price, PricePair};
use crate::error::{Error, Result, SourceError};
use crate::port::{CatalogSource, SecondarySource};

/// A finished lookup and how long to cache it.
#[derive(Debug, Clone)]
struct Resolution {
    pair: PricePair,
    ttl: Duration,
}

/// Running state of one lookup.
#[derive(Debug, Default)]
struct Search {
    /// Newest known primary price among fetched prints.
    best_tcg: Option<Money>,
    /// Vendor quote for the requested print when it had no primary price.
    requested_ck: Option<Money>,
    /// Some source answered.
    reachable: bool,
    /// Some source was unavailable or timed out.
    unreachable: bool,
    probes: usize,
    skipped: usize,
}

impl Search {
    fn observe(&mut self, outcome: &FetchOutcome) {
        if self.best_tcg.is_none() {
            self.best_tcg = outcome.primary.money();
        }
        if outcome.unavailable {
            self.unreachable = true;
        } else {
            self.reachable = true;
        }
    }

    /// Every source call that was made failed as unavailable.
    const fn all_unavailable(&self) -> bool {
        self.unreachable && !self.reachable
    }
}

struct ResolverInner {
    fetcher: Fetcher,
    cache: PriceCache,
    inflight: Coalescer,
    config: PricingConfig,
}

/// Resolves card keys to price pairs with caching, coalescing and
/// cross-print fallback.
///
/// Cloning is cheap; clones share the cache and the in-flight table.
#[derive(Clone)]
pub struct Resolver {
    inner: Arc<ResolverInner>,
}

impl Resolver {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        secondary: Arc<dyn SecondarySource>,
        config: PricingConfig,
    ) -> Self {
        Self {
            inner: Arc::new(ResolverInner {
                fetcher: Fetcher::new(catalog, secondary, &config),
                cache: PriceCache::new(config.max_cache_entries),
                inflight: Coalescer::new(),
                config,
            }),
        }
    }

    /// Resolve `key` to a price pair. Never fails.
    pub async fn resolve(&self, key: &CardKey) -> PricePair {
        if let Some(pair) = self.fast_path(key) {
            return pair;
        }
        self.flight(key).await
    }

    /// Resolve `key`, giving up when `cancel` fires.
    ///
    /// Cancelling detaches only this caller. If no other caller is waiting on
    /// the same lookup, its source calls are dropped and nothing is cached.
    pub async fn resolve_with_cancel(
        &self,
        key: &CardKey,
        cancel: &CancellationToken,
    ) -> Result<PricePair> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if let Some(pair) = self.fast_path(key) {
            return Ok(pair);
        }

        let flight = self.flight(key);
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(key = %key, "Lookup cancelled by caller");
                Err(Error::Cancelled)
            }
            pair = flight => Ok(pair),
        }
    }

    /// Drop the cached pair for `key`. An in-flight lookup for it keeps
    /// serving its waiters but will not repopulate the cache.
    pub fn invalidate(&self, key: &CardKey) {
        self.inner.inflight.detach(key);
        self.inner.cache.invalidate(key);
    }

    /// Drop every cached pair.
    pub fn invalidate_all(&self) {
        self.inner.inflight.detach_all();
        self.inner.cache.clear();
        info!("Price cache cleared");
    }

    /// The underlying cache, for seeding and inspection.
    #[must_use]
    pub fn cache(&self) -> &PriceCache {
        &self.inner.cache
    }

    /// Number of lookups currently in flight.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.inflight.len()
    }

    #[must_use]
    pub fn config(&self) -> &PricingConfig {
        &self.inner.config
    }

    fn fast_path(&self, key: &CardKey) -> Option<PricePair> {
        if key.is_blank() {
            return Some(PricePair::unknown());
        }
        let cached = self.inner.cache.get(key);
        if cached.is_some() {
            debug!(key = %key, "Price cache hit");
        }
        cached
    }

    fn flight(&self, key: &CardKey) -> Flight {
        let inner = Arc::clone(&self.inner);
        let joined = self.inner.inflight.join_or_start(key, move |guard| {
            async move {
                // Another flight may have committed between the caller's
                // cache miss and this flight starting.
                if let Some(pair) = inner.cache.get(guard.key()) {
                    return pair;
                }
                let resolution = inner.lookup(guard.key()).await;
                let committed = guard.commit_if_current(|| {
                    inner
                        .cache
                        .put(guard.key().clone(), resolution.pair.clone(), resolution.ttl);
                });
                if !committed {
                    debug!(key = %guard.key(), "Lookup invalidated while in flight, not caching");
                }
                resolution.pair
            }
            .boxed()
        });
        joined.flight
    }
}

impl ResolverInner {
    async fn lookup(&self, key: &CardKey) -> Resolution {
        let deadline = Instant::now() + self.config.resolver_deadline();
        let mut search = Search::default();

        let searched = timeout_at(deadline, self.search(key, &mut search)).await;
        match searched {
            Ok(pair) => {
                let ttl = if pair.has_any_price() {
                    self.config.positive_ttl()
                } else {
                    self.config.negative_ttl()
                };
                info!(
                    key = %key,
                    tcg = %pair.tcg(),
                    ck = %pair.ck(),
                    ck_source = %pair.source().ck,
                    probes = search.probes,
                    skipped = search.skipped,
                    "Resolved price"
                );
                if search.all_unavailable() && !pair.has_any_price() {
                    warn!(key = %key, "Price sources unavailable, caching with negative TTL");
                }
                Resolution { pair, ttl }
            }
            Err(_) => {
                let pair = self.finalize(&search);
                info!(
                    key = %key,
                    tcg = %pair.tcg(),
                    probes = search.probes,
                    "Resolver deadline reached, using best-seen price"
                );
                Resolution {
                    pair,
                    ttl: self.config.negative_ttl(),
                }
            }
        }
    }

    async fn search(&self, key: &CardKey, search: &mut Search) -> PricePair {
        let tried = if key.is_wildcard() {
            None
        } else {
            let outcome = self.fetcher.fetch(key.name(), key.set()).await;
            if outcome.pair.is_complete() {
                return outcome.pair;
            }
            search.observe(&outcome);
            search.requested_ck = outcome.secondary.money();
            debug!(key = %key, "Requested print incomplete, falling back to other prints");
            Some(key.set())
        };

        let prints = match self.fetcher.prints(key.name()).await {
            Ok(prints) => prints,
            Err(SourceError::Unavailable | SourceError::Timeout) => {
                search.unreachable = true;
                Vec::new()
            }
            Err(_) => Vec::new(),
        };

        // A vendor quote for the requested print pairs with the newest
        // enumerated primary without probing the vendor again.
        if let Some(ck) = search.requested_ck {
            if let Some(tcg) = prints.iter().find_map(|print| print.primary_price.money()) {
                debug!(key = %key, "Pairing requested print quote with newest primary");
                return PricePair::direct(tcg, ck);
            }
        }

        let candidates = prints
            .iter()
            .filter(|print| Some(print.set.as_str()) != tried)
            .take(self.config.max_fallback_prints);

        for print in candidates {
            search.probes += 1;
            let outcome = self.fetcher.fetch_print(print).await;

            if outcome.rate_limited {
                debug!(key = %key, set = %print.set, "Rate limited, skipping print");
                search.skipped += 1;
                continue;
            }

            if let Price::Money(ck) = outcome.secondary {
                // The print's own primary is canonical; a newer print's
                // primary stands in when this one has none.
                if let Some(tcg) = outcome.primary.money().or(search.best_tcg) {
                    debug!(key = %key, set = %print.set, "Direct secondary price found");
                    return PricePair::direct(tcg, ck);
                }
            }

            search.observe(&outcome);
        }

        self.finalize(search)
    }

    fn finalize(&self, search: &Search) -> PricePair {
        match (search.best_tcg, search.requested_ck) {
            (Some(tcg), Some(ck)) => PricePair::direct(tcg, ck),
            (Some(tcg), None) => {
                PricePair::from_primary(Price::Money(tcg), self.fetcher.multiplier())
            }
            (None, _) => PricePair::unknown(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::Provenance;
    use crate::testkit::source::{money, ScriptedCatalog, ScriptedSecondary};
    use rust_decimal_macros::dec;

    fn resolver(catalog: ScriptedCatalog, secondary: ScriptedSecondary) -> Resolver {
        Resolver::new(
            Arc::new(catalog),
            Arc::new(secondary),
            PricingConfig::default(),
        )
    }

    #[tokio::test]
    async fn blank_name_is_unknown_without_io() {
        let catalog = ScriptedCatalog::new();
        let calls = catalog.calls();
        let secondary = ScriptedSecondary::new();
        let secondary_calls = secondary.calls();
        let resolver = resolver(catalog, secondary);

        let pair = resolver.resolve(&CardKey::new("   ", "C21")).await;
        assert!(!pair.has_any_price());
        assert_eq!(calls.total(), 0);
        assert_eq!(secondary_calls.total(), 0);
        assert!(resolver.cache().is_empty());
    }

    #[tokio::test]
    async fn specific_set_hit_skips_enumeration() {
        let catalog = ScriptedCatalog::new().with_print("sol ring", "C21", Some(dec!(2.00)));
        let calls = catalog.calls();
        let secondary = ScriptedSecondary::new().with_price("sol ring", "C21", dec!(2.30));
        let resolver = resolver(catalog, secondary);

        let pair = resolver.resolve(&CardKey::new("Sol Ring", "c21")).await;
        assert_eq!(pair.tcg(), Price::Money(money(dec!(2.00))));
        assert_eq!(pair.ck(), Price::Money(money(dec!(2.30))));
        assert_eq!(calls.get_print(), 1);
        assert_eq!(calls.get_prints(), 0);
    }

    #[tokio::test]
    async fn unknown_specific_print_falls_back_excluding_tried_set() {
        let catalog = ScriptedCatalog::new()
            .with_print("counterspell", "MH3", Some(dec!(1.50)))
            .with_print("counterspell", "CMM", Some(dec!(1.00)));
        let secondary = ScriptedSecondary::new().with_price("counterspell", "CMM", dec!(1.20));
        let secondary_calls = secondary.calls();
        let resolver = resolver(catalog, secondary);

        // XYZ is not a real print: both specific lookups miss.
        let pair = resolver.resolve(&CardKey::new("Counterspell", "XYZ")).await;
        assert!(pair.has_direct_ck());
        assert_eq!(pair.ck(), Price::Money(money(dec!(1.20))));
        assert_eq!(pair.tcg(), Price::Money(money(dec!(1.00))));
        assert_eq!(secondary_calls.for_set("XYZ"), 1);
        assert_eq!(secondary_calls.for_set("MH3"), 1);
        assert_eq!(secondary_calls.for_set("CMM"), 1);
    }

    #[tokio::test]
    async fn direct_hit_without_primary_borrows_newer_primary() {
        let catalog = ScriptedCatalog::new()
            .with_print("brainstorm", "MH3", Some(dec!(3.00)))
            .with_print("brainstorm", "ICE", None);
        let secondary = ScriptedSecondary::new().with_price("brainstorm", "ICE", dec!(5.00));
        let resolver = resolver(catalog, secondary);

        let pair = resolver.resolve(&CardKey::wildcard("Brainstorm")).await;
        assert_eq!(pair.tcg(), Price::Money(money(dec!(3.00))));
        assert_eq!(pair.ck(), Price::Money(money(dec!(5.00))));
        assert_eq!(pair.source().ck, Provenance::Secondary);
    }

    #[tokio::test]
    async fn requested_print_quote_pairs_with_newer_primary() {
        let catalog = ScriptedCatalog::new()
            .with_print("brainstorm", "MH3", Some(dec!(3.00)))
            .with_print("brainstorm", "ICE", None);
        let secondary = ScriptedSecondary::new().with_price("brainstorm", "ICE", dec!(5.00));
        let secondary_calls = secondary.calls();
        let resolver = resolver(catalog, secondary);

        let pair = resolver.resolve(&CardKey::new("Brainstorm", "ICE")).await;
        assert_eq!(pair.tcg(), Price::Money(money(dec!(3.00))));
        assert_eq!(pair.ck(), Price::Money(money(dec!(5.00))));
        assert_eq!(pair.source().ck, Provenance::Secondary);
        assert_eq!(secondary_calls.for_set("ICE"), 1);
        assert_eq!(secondary_calls.total(), 1);
    }

    #[tokio::test]
    async fn rate_limited_prints_are_skipped() {
        let catalog = ScriptedCatalog::new()
            .with_print("ponder", "MH3", Some(dec!(0.50)))
            .with_print("ponder", "M12", Some(dec!(0.40)));
        let secondary = ScriptedSecondary::new()
            .failing_for("ponder", "MH3", SourceError::RateLimited)
            .with_price("ponder", "M12", dec!(0.45));
        let resolver = resolver(catalog, secondary);

        let pair = resolver.resolve(&CardKey::wildcard("Ponder")).await;
        assert_eq!(pair.tcg(), Price::Money(money(dec!(0.40))));
        assert_eq!(pair.ck(), Price::Money(money(dec!(0.45))));
    }

    #[tokio::test]
    async fn disabled_derivation_leaves_secondary_unknown() {
        let catalog = ScriptedCatalog::new().with_print("ponder", "M12", Some(dec!(0.40)));
        let config = PricingConfig {
            fallback_multiplier: rust_decimal::Decimal::ZERO,
            ..Default::default()
        };
        let resolver = Resolver::new(
            Arc::new(catalog),
            Arc::new(ScriptedSecondary::new()),
            config,
        );

        let pair = resolver.resolve(&CardKey::new("Ponder", "M12")).await;
        assert_eq!(pair.tcg(), Price::Money(money(dec!(0.40))));
        assert!(pair.ck().is_unknown());
        assert_eq!(pair.source().ck, Provenance::Unknown);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_returns_best_seen_with_negative_ttl() {
        let mut catalog = ScriptedCatalog::new();
        for (offset, set) in ["AAA", "BBB", "CCC", "DDD", "EEE", "FFF", "GGG"].iter().enumerate() {
            let year = 2024 - offset as i32;
            catalog = catalog.with_dated_print("opt", set, Some(dec!(0.25)), year);
        }
        let secondary = ScriptedSecondary::new().with_delay(Duration::from_millis(2_900));
        let resolver = resolver(catalog, secondary);
        let key = CardKey::wildcard("Opt");

        let started = Instant::now();
        let pair = resolver.resolve(&key).await;
        assert!(started.elapsed() <= Duration::from_secs(15));
        assert_eq!(pair.tcg(), Price::Money(money(dec!(0.25))));
        assert_eq!(pair.source().ck, Provenance::Derived);

        let entry = resolver.cache().entry(&key).unwrap();
        assert!(entry.expires_at <= Instant::now() + Duration::from_secs(300));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_lookup_does_not_populate_cache() {
        let catalog = ScriptedCatalog::new()
            .with_print("ponder", "M12", Some(dec!(0.40)))
            .with_delay(Duration::from_secs(2));
        let resolver = resolver(catalog, ScriptedSecondary::new());
        let key = CardKey::wildcard("Ponder");
        let cancel = CancellationToken::new();

        let lookup = resolver.resolve_with_cancel(&key, &cancel);
        let canceller = async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            cancel.cancel();
        };
        let (result, ()) = tokio::join!(lookup, canceller);

        assert!(matches!(result, Err(Error::Cancelled)));
        assert!(resolver.cache().is_empty());
        assert_eq!(resolver.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelling_one_waiter_leaves_the_other_served() {
        let catalog = ScriptedCatalog::new()
            .with_print("ponder", "M12", Some(dec!(0.40)))
            .with_delay(Duration::from_secs(2));
        let calls = catalog.calls();
        let resolver = resolver(catalog, ScriptedSecondary::new());
        let key = CardKey::wildcard("Ponder");
        let cancel_first = CancellationToken::new();
        let keep_second = CancellationToken::new();

        let first = resolver.resolve_with_cancel(&key, &cancel_first);
        let second = resolver.resolve_with_cancel(&key, &keep_second);
        let canceller = async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            cancel_first.cancel();
        };
        let (first, second, ()) = tokio::join!(first, second, canceller);

        assert!(matches!(first, Err(Error::Cancelled)));
        let pair = second.unwrap();
        assert_eq!(pair.tcg(), Price::Money(money(dec!(0.40))));
        assert_eq!(calls.get_prints(), 1);
        assert_eq!(resolver.cache().len(), 1);
        assert_eq!(resolver.cache().get(&key), Some(pair));
        assert_eq!(resolver.pending(), 0);
    }

    #[test]
    fn search_is_unavailable_only_when_no_source_answered() {
        let outcome = |unavailable| FetchOutcome {
            pair: PricePair::unknown(),
            primary: Price::Unknown,
            secondary: Price::Unknown,
            rate_limited: false,
            unavailable,
        };

        let mut search = Search::default();
        assert!(!search.all_unavailable());
        search.observe(&outcome(true));
        search.observe(&outcome(true));
        assert!(search.all_unavailable());
        search.observe(&outcome(false));
        assert!(!search.all_unavailable());
    }

    #[tokio::test(start_paused = true)]
    async fn invalidating_in_flight_key_prevents_cache_write() {
        let catalog = ScriptedCatalog::new()
            .with_print("ponder", "M12", Some(dec!(0.40)))
            .with_delay(Duration::from_secs(1));
        let resolver = resolver(catalog, ScriptedSecondary::new());
        let key = CardKey::new("Ponder", "M12");

        let lookup = resolver.resolve(&key);
        let invalidate = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            resolver.invalidate(&key);
        };
        let (pair, ()) = tokio::join!(lookup, invalidate);

        assert!(pair.has_any_price(), "waiter still receives the result");
        assert!(resolver.cache().get(&key).is_none());
    }
}
