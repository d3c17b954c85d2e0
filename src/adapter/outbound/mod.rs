//! Outbound adapters (driven side).

pub mod http;
pub mod proxy;
pub mod scryfall;
