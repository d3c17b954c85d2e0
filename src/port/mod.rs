//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! The pricing pipeline talks to the outside world through these traits:
//!
//! - [`CatalogSource`] - print metadata and primary prices
//! - [`SecondarySource`] - per-print secondary vendor prices
//! - [`InventorySets`] - the collection's known printing for a card name
//!
//! Adapters in [`crate::adapter`] implement them over HTTP; the
//! [`crate::testkit`] module provides scripted fakes.

pub mod outbound;

pub use outbound::catalog::CatalogSource;
pub use outbound::inventory::{InventorySets, NoInventory, StaticInventory};
pub use outbound::secondary::SecondarySource;
