//! Aggregator inputs and outputs.

use std::num::NonZeroU32;

use serde::Serialize;

use super::card::CardKey;
use super::money::Money;
use super::pair::PricePair;

/// One decklist or container line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub name: String,
    pub set: Option<String>,
    pub quantity: NonZeroU32,
}

impl LineItem {
    /// Create a line. Returns `None` for a blank name or zero quantity.
    pub fn new(name: impl Into<String>, set: Option<String>, quantity: u32) -> Option<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return None;
        }
        let set = set.filter(|s| !s.trim().is_empty());
        Some(Self {
            name,
            set,
            quantity: NonZeroU32::new(quantity)?,
        })
    }
}

/// A container slot: a card with a known printing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerItem {
    pub name: String,
    pub set: String,
    pub quantity: u32,
}

impl From<ContainerItem> for Option<LineItem> {
    fn from(item: ContainerItem) -> Self {
        LineItem::new(item.name, Some(item.set), item.quantity)
    }
}

/// Sums over a priced collection of lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub tcg_total: Money,
    pub ck_total: Money,
    /// Lines with at least one unknown component.
    pub unpriced: usize,
}

/// A line together with the key it was resolved under and the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub line: LineItem,
    pub key: CardKey,
    pub pair: PricePair,
}

/// Totals plus the per-line breakdown, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceReport {
    pub totals: Totals,
    pub lines: Vec<PricedLine>,
}
