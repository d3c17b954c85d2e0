//! Card pricing domain types.

mod card;
mod decklist;
mod line;
mod money;
mod pair;
mod print;

pub use card::{normalize_name, normalize_set, CardKey};
pub use decklist::{parse_decklist, parse_line};
pub use line::{ContainerItem, LineItem, PriceReport, PricedLine, Totals};
pub use money::{Money, Price, UNKNOWN_PLACEHOLDER};
pub use pair::{PricePair, PriceSources, Provenance};
pub use print::{sort_newest_first, PrintRecord};
