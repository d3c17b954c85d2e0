//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`source`] — Scripted [`CatalogSource`](crate::port::CatalogSource) and
//!   [`SecondarySource`](crate::port::SecondarySource) implementations with
//!   call counters.
//! - [`domain`] — Builders for lines and price pairs.

pub mod domain;
pub mod source;
