//! Card pricing pipeline: fetcher, resolver, coalescer and aggregator.

pub mod aggregator;
pub mod coalescer;
pub mod config;
pub mod fetcher;
pub mod resolver;
pub mod service;

pub use aggregator::{sum_lines, Aggregator};
pub use coalescer::{Coalescer, Flight, FlightGuard};
pub use config::PricingConfig;
pub use fetcher::{FetchOutcome, Fetcher};
pub use resolver::Resolver;
pub use service::PriceService;
