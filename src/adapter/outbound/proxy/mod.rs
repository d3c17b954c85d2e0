//! Backend price proxy adapter for the secondary vendor.

mod client;
pub mod dto;
mod settings;

pub use client::PriceProxyClient;
pub use settings::SecondaryConfig;
