//! Stateful caches for resolved prices.

mod price;

pub use price::{CacheEntry, PriceCache};
