//! Resolved price pairs and their provenance.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::money::{Money, Price};

/// Where a price component came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Read from the catalog print record.
    Catalog,
    /// Read from the secondary vendor proxy.
    Secondary,
    /// Computed from the primary price via the fallback multiplier.
    Derived,
    /// No source produced a value.
    Unknown,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Catalog => "catalog",
            Self::Secondary => "secondary",
            Self::Derived => "derived",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Provenance of both components of a [`PricePair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PriceSources {
    pub tcg: Provenance,
    pub ck: Provenance,
}

/// One resolved pricing result for a card key.
///
/// Invariant: when `tcg` is unknown, `ck` is unknown or derived. The
/// constructors below are the only way the pipeline builds pairs, and each
/// of them upholds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricePair {
    tcg: Price,
    ck: Price,
    source: PriceSources,
    fetched_at: DateTime<Utc>,
}

impl PricePair {
    /// Both components unknown.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            tcg: Price::Unknown,
            ck: Price::Unknown,
            source: PriceSources {
                tcg: Provenance::Unknown,
                ck: Provenance::Unknown,
            },
            fetched_at: Utc::now(),
        }
    }

    /// Primary and secondary both read directly from their sources.
    #[must_use]
    pub fn direct(tcg: Money, ck: Money) -> Self {
        Self {
            tcg: Price::Money(tcg),
            ck: Price::Money(ck),
            source: PriceSources {
                tcg: Provenance::Catalog,
                ck: Provenance::Secondary,
            },
            fetched_at: Utc::now(),
        }
    }

    /// Primary price only; the secondary is left unknown.
    #[must_use]
    pub fn primary_only(tcg: Money) -> Self {
        Self {
            tcg: Price::Money(tcg),
            ck: Price::Unknown,
            source: PriceSources {
                tcg: Provenance::Catalog,
                ck: Provenance::Unknown,
            },
            fetched_at: Utc::now(),
        }
    }

    /// Primary price with the secondary derived via `multiplier`.
    ///
    /// A product too large to represent leaves the secondary unknown.
    #[must_use]
    pub fn derived(tcg: Money, multiplier: Decimal) -> Self {
        let Some(ck) = tcg.times(multiplier) else {
            return Self::primary_only(tcg);
        };
        Self {
            tcg: Price::Money(tcg),
            ck: Price::Money(ck),
            source: PriceSources {
                tcg: Provenance::Catalog,
                ck: Provenance::Derived,
            },
            fetched_at: Utc::now(),
        }
    }

    /// Build from a primary price and an optional derivation multiplier.
    ///
    /// Unknown primary gives the all-unknown pair; a known primary without a
    /// multiplier leaves the secondary unknown.
    #[must_use]
    pub fn from_primary(tcg: Price, multiplier: Option<Decimal>) -> Self {
        match (tcg, multiplier) {
            (Price::Money(tcg), Some(k)) => Self::derived(tcg, k),
            (Price::Money(tcg), None) => Self::primary_only(tcg),
            (Price::Unknown, _) => Self::unknown(),
        }
    }

    #[must_use]
    pub const fn tcg(&self) -> Price {
        self.tcg
    }

    #[must_use]
    pub const fn ck(&self) -> Price {
        self.ck
    }

    #[must_use]
    pub const fn source(&self) -> PriceSources {
        self.source
    }

    #[must_use]
    pub const fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Both components are known amounts, whether direct or derived.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.tcg.is_known() && self.ck.is_known()
    }

    /// At least one component is a known amount.
    #[must_use]
    pub const fn has_any_price(&self) -> bool {
        self.tcg.is_known() || self.ck.is_known()
    }

    /// The secondary price came straight from the secondary source.
    #[must_use]
    pub fn has_direct_ck(&self) -> bool {
        self.source.ck == Provenance::Secondary && self.ck.is_known()
    }
}

impl fmt::Display for PricePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tcg {} ({}), ck {} ({})",
            self.tcg, self.source.tcg, self.ck, self.source.ck
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn money(amount: Decimal) -> Money {
        Money::new(amount).unwrap()
    }

    #[test]
    fn derived_pair_multiplies_primary() {
        let pair = PricePair::derived(money(dec!(4.00)), dec!(1.15));
        assert_eq!(pair.ck().money().unwrap().round2(), dec!(4.60));
        assert_eq!(pair.source().ck, Provenance::Derived);
        assert!(pair.is_complete());
        assert!(!pair.has_direct_ck());
    }

    #[test]
    fn from_primary_respects_disabled_derivation() {
        let pair = PricePair::from_primary(Price::Money(money(dec!(2))), None);
        assert!(pair.tcg().is_known());
        assert!(pair.ck().is_unknown());
        assert!(!pair.is_complete());
        assert!(pair.has_any_price());

        let none = PricePair::from_primary(Price::Unknown, Some(dec!(1.15)));
        assert_eq!(none.tcg(), Price::Unknown);
        assert_eq!(none.ck(), Price::Unknown);
        assert!(!none.has_any_price());
    }

    #[test]
    fn overflowing_derivation_leaves_secondary_unknown() {
        let huge = Money::new(Decimal::MAX).unwrap();
        let pair = PricePair::derived(huge, dec!(1.15));
        assert_eq!(pair.tcg(), Price::Money(huge));
        assert!(pair.ck().is_unknown());
        assert_eq!(pair.source().ck, Provenance::Unknown);
    }

    #[test]
    fn display_includes_provenance() {
        let pair = PricePair::direct(money(dec!(2)), money(dec!(2.3)));
        assert_eq!(pair.to_string(), "tcg $2.00 (catalog), ck $2.30 (secondary)");
        assert_eq!(
            PricePair::unknown().to_string(),
            "tcg N/A (unknown), ck N/A (unknown)"
        );
    }
}
