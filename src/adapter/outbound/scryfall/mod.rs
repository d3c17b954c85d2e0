//! Scryfall catalog adapter for print records and primary prices.

mod client;
pub mod dto;
mod settings;

pub use client::ScryfallClient;
pub use settings::CatalogConfig;
