//! Catalog print records.

use chrono::NaiveDate;

use super::card::normalize_set;
use super::money::Price;

/// One printing of a card as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintRecord {
    pub name: String,
    /// Upper-case set code.
    pub set: String,
    pub set_name: String,
    pub released_at: Option<NaiveDate>,
    pub primary_price: Price,
}

impl PrintRecord {
    /// Create a print record, normalizing the set code.
    pub fn new(name: impl Into<String>, set: &str, primary_price: Price) -> Self {
        Self {
            name: name.into(),
            set: normalize_set(set),
            set_name: String::new(),
            released_at: None,
            primary_price,
        }
    }

    #[must_use]
    pub fn with_set_name(mut self, set_name: impl Into<String>) -> Self {
        self.set_name = set_name.into();
        self
    }

    #[must_use]
    pub fn with_release(mut self, released_at: NaiveDate) -> Self {
        self.released_at = Some(released_at);
        self
    }
}

/// Order prints newest first. Undated prints sort last; ties keep input order.
pub fn sort_newest_first(prints: &mut [PrintRecord]) {
    prints.sort_by(|a, b| b.released_at.cmp(&a.released_at));
}
