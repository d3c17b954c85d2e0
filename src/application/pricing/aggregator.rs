//! Decklist and container totals.

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, info};

use super::resolver::Resolver;
use crate::core::domain::{CardKey, LineItem, Money, PriceReport, PricedLine, Totals};
use crate::port::InventorySets;

/// Prices collections of lines through the [`Resolver`].
///
/// Lines are resolved concurrently; duplicate keys coalesce in the resolver.
/// Unresolved lines never fail the aggregate, they are counted as unpriced.
#[derive(Clone)]
pub struct Aggregator {
    resolver: Resolver,
    inventory: Arc<dyn InventorySets>,
}

impl Aggregator {
    pub fn new(resolver: Resolver, inventory: Arc<dyn InventorySets>) -> Self {
        Self {
            resolver,
            inventory,
        }
    }

    /// Price every line and sum the results.
    pub async fn price_lines(&self, lines: Vec<LineItem>) -> PriceReport {
        let keys = join_all(lines.iter().map(|line| self.key_for(line))).await;
        let pairs = join_all(keys.iter().map(|key| self.resolver.resolve(key))).await;

        let lines: Vec<PricedLine> = lines
            .into_iter()
            .zip(keys)
            .zip(pairs)
            .map(|((line, key), pair)| PricedLine { line, key, pair })
            .collect();

        let totals = sum_lines(&lines);
        info!(
            lines = lines.len(),
            tcg_total = %totals.tcg_total,
            ck_total = %totals.ck_total,
            unpriced = totals.unpriced,
            "Priced collection"
        );

        PriceReport { totals, lines }
    }

    /// Key for one line: its own set, else the owned printing, else wildcard.
    async fn key_for(&self, line: &LineItem) -> CardKey {
        if let Some(set) = &line.set {
            return CardKey::new(&line.name, set);
        }
        match self.inventory.known_set(&line.name).await {
            Some(set) => {
                debug!(name = %line.name, set = %set, "Using inventory printing");
                CardKey::new(&line.name, set)
            }
            None => CardKey::wildcard(&line.name),
        }
    }
}

/// Sum priced lines. Independent of resolution order.
#[must_use]
pub fn sum_lines(lines: &[PricedLine]) -> Totals {
    let mut totals = Totals::default();
    for priced in lines {
        let quantity = priced.line.quantity.get();
        let tcg = priced.pair.tcg().money();
        let ck = priced.pair.ck().money();

        totals.tcg_total += tcg.map_or(Money::ZERO, |m| m.scaled(quantity));
        totals.ck_total += ck.map_or(Money::ZERO, |m| m.scaled(quantity));
        if tcg.is_none() || ck.is_none() {
            totals.unpriced += 1;
        }
    }
    totals
}
