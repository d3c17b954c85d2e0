//! Builders for domain primitives used across tests.

use rust_decimal::Decimal;

use super::source::money;
use crate::core::domain::{CardKey, LineItem, PricePair, PricedLine};

/// A decklist line. Panics on a zero quantity.
pub fn line(name: &str, set: Option<&str>, quantity: u32) -> LineItem {
    LineItem::new(name, set.map(str::to_string), quantity).expect("quantity must be non-zero")
}

/// A pair with both prices quoted directly.
pub fn direct_pair(tcg: Decimal, ck: Decimal) -> PricePair {
    PricePair::direct(money(tcg), money(ck))
}

/// A pair whose secondary price was derived from `tcg`.
pub fn derived_pair(tcg: Decimal, multiplier: Decimal) -> PricePair {
    PricePair::derived(money(tcg), multiplier)
}

/// A priced wildcard line.
pub fn priced(name: &str, quantity: u32, pair: PricePair) -> PricedLine {
    PricedLine {
        key: CardKey::wildcard(name),
        line: line(name, None, quantity),
        pair,
    }
}
