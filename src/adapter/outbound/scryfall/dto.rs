//! Scryfall response bodies.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::core::domain::{Money, Price, PrintRecord};

/// Paginated list wrapper returned by `/cards/search`.
#[derive(Debug, Deserialize)]
pub struct ScryfallList {
    #[serde(default)]
    pub data: Vec<ScryfallCard>,
    #[serde(default)]
    pub has_more: bool,
}

/// One card print.
#[derive(Debug, Deserialize)]
pub struct ScryfallCard {
    pub name: String,
    pub set: String,
    #[serde(default)]
    pub set_name: String,
    #[serde(default)]
    pub released_at: Option<NaiveDate>,
    #[serde(default)]
    pub prices: ScryfallPrices,
}

/// Price strings; Scryfall sends `null` for missing prices.
#[derive(Debug, Default, Deserialize)]
pub struct ScryfallPrices {
    pub usd: Option<String>,
    pub usd_foil: Option<String>,
    pub usd_etched: Option<String>,
}

impl ScryfallPrices {
    /// Non-foil price, falling back to foil and then etched finishes.
    #[must_use]
    pub fn primary(&self) -> Price {
        [&self.usd, &self.usd_foil, &self.usd_etched]
            .into_iter()
            .flatten()
            .find_map(|raw| Money::parse_dollars(raw))
            .into()
    }
}

impl From<ScryfallCard> for PrintRecord {
    fn from(card: ScryfallCard) -> Self {
        let primary = card.prices.primary();
        let record = PrintRecord::new(card.name, &card.set, primary).with_set_name(card.set_name);
        match card.released_at {
            Some(date) => record.with_release(date),
            None => record,
        }
    }
}
