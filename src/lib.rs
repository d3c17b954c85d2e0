//! BigDeck pricing - card price resolution for a Magic: The Gathering
//! collection manager.
//!
//! Resolves a card (name plus optional set) to a pair of prices: the primary
//! marketplace price reported by the card catalog and the secondary vendor
//! price reported by a price proxy. Missing vendor prices fall back across
//! other printings of the card and, failing that, are derived from the
//! primary price.
//!
//! # Architecture
//!
//! - [`core`] - Domain types (card keys, money, price pairs, decklists) and
//!   the TTL price cache
//! - [`port`] - Traits for the catalog, secondary and inventory sources
//! - [`application`] - Fetcher, request coalescer, resolver, aggregator and
//!   the [`PriceService`](application::pricing::PriceService) facade
//! - [`adapter`] - HTTP adapters for Scryfall and the price proxy
//! - [`infrastructure`] - Configuration, logging and component wiring
//! - [`cli`] - The `bigdeck` command line
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use bigdeck::infrastructure::config::settings::Config;
//! use bigdeck::infrastructure::factory::pricing::build_price_service;
//!
//! # async fn run() -> bigdeck::error::Result<()> {
//! let config = Config::load_or_default("config.toml")?;
//! let service = build_price_service(&config, None)?;
//! let pair = service.resolve("Sol Ring", "C21").await;
//! println!("{} / {}", pair.tcg(), pair.ck());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod cli;
pub mod core;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
