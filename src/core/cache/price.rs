//! Process-local TTL cache of resolved price pairs.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::core::domain::{CardKey, PricePair};

/// A stored pair and the instant it stops being served.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub pair: PricePair,
    pub expires_at: Instant,
    last_used: u64,
}

impl CacheEntry {
    #[must_use]
    pub fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Default)]
struct Slots {
    entries: HashMap<CardKey, CacheEntry>,
    /// Access tick to key, oldest first. One row per entry.
    order: BTreeMap<u64, CardKey>,
    tick: u64,
}

impl Slots {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn remove(&mut self, key: &CardKey) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.order.remove(&entry.last_used);
        Some(entry)
    }
}

/// Key to entry mapping with time-based expiry and an optional LRU cap.
///
/// Expired entries are evicted lazily when they are looked up, or in bulk by
/// [`PriceCache::prune_expired`]. Operations never suspend.
#[derive(Debug)]
pub struct PriceCache {
    slots: Mutex<Slots>,
    /// Zero means unbounded.
    max_entries: usize,
}

impl PriceCache {
    /// Create a cache holding at most `max_entries` pairs (`0` = no cap).
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            slots: Mutex::new(Slots::default()),
            max_entries,
        }
    }

    /// Get an unexpired pair.
    #[must_use]
    pub fn get(&self, key: &CardKey) -> Option<PricePair> {
        let now = Instant::now();
        let mut guard = self.slots.lock();
        let slots = &mut *guard;

        if !slots.entries.get(key)?.is_fresh(now) {
            slots.remove(key);
            return None;
        }

        let tick = slots.next_tick();
        let entry = slots.entries.get_mut(key)?;
        let previous = std::mem::replace(&mut entry.last_used, tick);
        let pair = entry.pair.clone();
        slots.order.remove(&previous);
        slots.order.insert(tick, key.clone());
        Some(pair)
    }

    /// Get the raw entry, expired or not. Does not touch LRU order.
    #[must_use]
    pub fn entry(&self, key: &CardKey) -> Option<CacheEntry> {
        self.slots.lock().entries.get(key).cloned()
    }

    /// Store a pair for `ttl`, replacing any existing entry.
    pub fn put(&self, key: CardKey, pair: PricePair, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        let mut guard = self.slots.lock();
        let slots = &mut *guard;
        let tick = slots.next_tick();

        let replaced = slots.entries.insert(
            key.clone(),
            CacheEntry {
                pair,
                expires_at,
                last_used: tick,
            },
        );
        if let Some(old) = replaced {
            slots.order.remove(&old.last_used);
        }
        slots.order.insert(tick, key);

        if self.max_entries > 0 {
            Self::evict(slots, self.max_entries);
        }
    }

    /// Remove one entry.
    pub fn invalidate(&self, key: &CardKey) {
        self.slots.lock().remove(key);
    }

    /// Remove every entry.
    pub fn clear(&self) {
        let mut slots = self.slots.lock();
        slots.entries.clear();
        slots.order.clear();
    }

    /// Number of stored entries, including expired ones not yet evicted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Prune expired entries. Returns count removed.
    pub fn prune_expired(&self) -> usize {
        let now = Instant::now();
        let mut guard = self.slots.lock();
        let slots = &mut *guard;
        let before = slots.entries.len();
        let order = &mut slots.order;
        slots.entries.retain(|_, entry| {
            let fresh = entry.is_fresh(now);
            if !fresh {
                order.remove(&entry.last_used);
            }
            fresh
        });
        before - slots.entries.len()
    }

    // Least recently used first.
    fn evict(slots: &mut Slots, max_entries: usize) {
        while slots.entries.len() > max_entries {
            match slots.order.pop_first() {
                Some((_, key)) => {
                    slots.entries.remove(&key);
                }
                None => break,
            }
        }
    }
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::Money;
    use rust_decimal_macros::dec;

    fn pair() -> PricePair {
        PricePair::direct(
            Money::new(dec!(2.00)).unwrap(),
            Money::new(dec!(2.30)).unwrap(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn serves_until_expiry_then_evicts_lazily() {
        let cache = PriceCache::new(0);
        let key = CardKey::new("Sol Ring", "C21");
        cache.put(key.clone(), pair(), Duration::from_secs(60));

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(cache.get(&key).is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get(&key).is_none());
        assert!(cache.is_empty(), "expired entry should be evicted on access");
    }

    #[tokio::test(start_paused = true)]
    async fn put_replaces_existing_entry() {
        let cache = PriceCache::new(0);
        let key = CardKey::wildcard("Counterspell");
        cache.put(key.clone(), PricePair::unknown(), Duration::from_secs(1));
        cache.put(key.clone(), pair(), Duration::from_secs(100));

        tokio::time::advance(Duration::from_secs(10)).await;
        let cached = cache.get(&key).unwrap();
        assert!(cached.has_direct_ck());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidate_and_clear() {
        let cache = PriceCache::new(0);
        let a = CardKey::new("Sol Ring", "C21");
        let b = CardKey::new("Sol Ring", "");
        cache.put(a.clone(), pair(), Duration::from_secs(60));
        cache.put(b.clone(), pair(), Duration::from_secs(60));

        cache.invalidate(&a);
        assert!(cache.get(&a).is_none());
        assert!(cache.get(&b).is_some());

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn lru_cap_evicts_least_recently_used() {
        let cache = PriceCache::new(2);
        let a = CardKey::wildcard("a");
        let b = CardKey::wildcard("b");
        let c = CardKey::wildcard("c");
        cache.put(a.clone(), pair(), Duration::from_secs(60));
        cache.put(b.clone(), pair(), Duration::from_secs(60));

        // Touch `a` so `b` becomes the eviction candidate.
        assert!(cache.get(&a).is_some());
        cache.put(c.clone(), pair(), Duration::from_secs(60));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&a).is_some());
        assert!(cache.get(&b).is_none());
        assert!(cache.get(&c).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn access_order_stays_in_step_with_entries() {
        let cache = PriceCache::new(3);
        let keys: Vec<CardKey> = ["a", "b", "c", "d"].into_iter().map(CardKey::wildcard).collect();
        for key in &keys[..3] {
            cache.put(key.clone(), pair(), Duration::from_secs(60));
        }
        // Replace and re-read `a` repeatedly; it must stay the newest.
        cache.put(keys[0].clone(), pair(), Duration::from_secs(60));
        assert!(cache.get(&keys[0]).is_some());
        assert!(cache.get(&keys[1]).is_some());

        cache.put(keys[3].clone(), pair(), Duration::from_secs(60));
        assert!(cache.entry(&keys[2]).is_none(), "oldest access is evicted");
        let order_len = cache.slots.lock().order.len();
        assert_eq!(order_len, cache.len());

        cache.invalidate(&keys[1]);
        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(cache.prune_expired(), 2);
        let slots = cache.slots.lock();
        assert!(slots.entries.is_empty());
        assert!(slots.order.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn prune_expired_counts_removed() {
        let cache = PriceCache::new(0);
        cache.put(CardKey::wildcard("a"), pair(), Duration::from_secs(1));
        cache.put(CardKey::wildcard("b"), pair(), Duration::from_secs(120));

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(cache.prune_expired(), 1);
        assert_eq!(cache.len(), 1);
    }
}
