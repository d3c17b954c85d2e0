//! Scripted [`CatalogSource`] and [`SecondarySource`] implementations.
//!
//! - [`ScriptedCatalog`] — fixed print list, optional delay or blanket failure.
//! - [`ScriptedSecondary`] — fixed vendor quotes, per-print failures.
//!
//! Both hand out call counters before being moved into an `Arc`, so tests can
//! assert how many source calls a resolution made.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::core::domain::{normalize_name, normalize_set, Money, Price, PrintRecord};
use crate::error::SourceError;
use crate::port::{CatalogSource, SecondarySource};

/// Build a [`Money`] from a non-negative decimal.
pub fn money(amount: Decimal) -> Money {
    Money::new(amount).expect("test amounts are non-negative")
}

fn price(amount: Option<Decimal>) -> Price {
    amount.map(money).into()
}

fn print_key(name: &str, set: &str) -> (String, String) {
    (normalize_name(name), normalize_set(set))
}

async fn pause(delay: Option<Duration>) {
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

// ---------------------------------------------------------------------------
// ScriptedCatalog
// ---------------------------------------------------------------------------

/// Call counters for a [`ScriptedCatalog`].
#[derive(Debug, Default)]
pub struct CatalogCalls {
    get_print: AtomicUsize,
    get_prints: AtomicUsize,
}

impl CatalogCalls {
    pub fn get_print(&self) -> usize {
        self.get_print.load(Ordering::SeqCst)
    }

    pub fn get_prints(&self) -> usize {
        self.get_prints.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.get_print() + self.get_prints()
    }
}

/// A catalog serving a fixed list of prints.
///
/// Prints are returned in insertion order unless they carry release dates;
/// add them newest first.
#[derive(Default)]
pub struct ScriptedCatalog {
    prints: Vec<PrintRecord>,
    delay: Option<Duration>,
    failure: Option<SourceError>,
    calls: Arc<CatalogCalls>,
}

impl ScriptedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an undated print. `None` leaves the primary price unknown.
    pub fn with_print(mut self, name: &str, set: &str, primary: Option<Decimal>) -> Self {
        self.prints.push(PrintRecord::new(name, set, price(primary)));
        self
    }

    /// Add a print released on January 1st of `year`.
    pub fn with_dated_print(
        mut self,
        name: &str,
        set: &str,
        primary: Option<Decimal>,
        year: i32,
    ) -> Self {
        let mut record = PrintRecord::new(name, set, price(primary));
        if let Some(date) = NaiveDate::from_ymd_opt(year, 1, 1) {
            record = record.with_release(date);
        }
        self.prints.push(record);
        self
    }

    /// Sleep before answering every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail every call with `error`.
    pub fn failing(mut self, error: SourceError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn calls(&self) -> Arc<CatalogCalls> {
        Arc::clone(&self.calls)
    }

    fn matching<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a PrintRecord> + 'a {
        let name = normalize_name(name);
        self.prints
            .iter()
            .filter(move |print| normalize_name(&print.name) == name)
    }
}

#[async_trait]
impl CatalogSource for ScriptedCatalog {
    async fn get_prints(&self, name: &str) -> Result<Vec<PrintRecord>, SourceError> {
        self.calls.get_prints.fetch_add(1, Ordering::SeqCst);
        pause(self.delay).await;
        if let Some(error) = self.failure {
            return Err(error);
        }
        Ok(self.matching(name).cloned().collect())
    }

    async fn get_print(&self, name: &str, set: &str) -> Result<PrintRecord, SourceError> {
        self.calls.get_print.fetch_add(1, Ordering::SeqCst);
        pause(self.delay).await;
        if let Some(error) = self.failure {
            return Err(error);
        }
        let set = normalize_set(set);
        self.matching(name)
            .find(|print| print.set == set)
            .cloned()
            .ok_or(SourceError::NotFound)
    }

    fn source_name(&self) -> &'static str {
        "scripted-catalog"
    }
}

// ---------------------------------------------------------------------------
// ScriptedSecondary
// ---------------------------------------------------------------------------

/// Call log for a [`ScriptedSecondary`].
#[derive(Debug, Default)]
pub struct SecondaryCalls {
    sets: Mutex<Vec<String>>,
}

impl SecondaryCalls {
    pub fn total(&self) -> usize {
        self.sets.lock().len()
    }

    /// Calls made for `set`, across all names.
    pub fn for_set(&self, set: &str) -> usize {
        let set = normalize_set(set);
        self.sets.lock().iter().filter(|s| **s == set).count()
    }
}

/// A vendor quoting fixed prices. Unquoted prints answer `N/A`.
#[derive(Default)]
pub struct ScriptedSecondary {
    prices: HashMap<(String, String), Money>,
    failures: HashMap<(String, String), SourceError>,
    delay: Option<Duration>,
    failure: Option<SourceError>,
    calls: Arc<SecondaryCalls>,
}

impl ScriptedSecondary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, name: &str, set: &str, amount: Decimal) -> Self {
        self.prices.insert(print_key(name, set), money(amount));
        self
    }

    /// Fail every call with `error`.
    pub fn failing(mut self, error: SourceError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Fail calls for one print with `error`.
    pub fn failing_for(mut self, name: &str, set: &str, error: SourceError) -> Self {
        self.failures.insert(print_key(name, set), error);
        self
    }

    /// Sleep before answering every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Arc<SecondaryCalls> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl SecondarySource for ScriptedSecondary {
    async fn get_secondary(&self, name: &str, set: &str) -> Result<Price, SourceError> {
        let key = print_key(name, set);
        self.calls.sets.lock().push(key.1.clone());
        pause(self.delay).await;

        if let Some(error) = self.failure.or_else(|| self.failures.get(&key).copied()) {
            return Err(error);
        }
        Ok(self.prices.get(&key).copied().into())
    }

    fn source_name(&self) -> &'static str {
        "scripted-secondary"
    }
}
