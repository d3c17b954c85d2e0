//! Monetary types for card prices.
//!
//! [`Money`] keeps full decimal precision internally; rounding to cents
//! happens only when a value is displayed or compared at the display
//! boundary. [`Price`] is the two-variant `Money | Unknown` threaded through
//! the pricing pipeline.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Placeholder rendered for unknown prices.
pub const UNKNOWN_PLACEHOLDER: &str = "N/A";

/// A non-negative dollar amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal amount. Returns `None` for negative amounts.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            None
        } else {
            Some(Self(amount))
        }
    }

    /// Parse a dollar string such as `"$2.00"`, `"2.5"` or `"$1,024.99"`.
    #[must_use]
    pub fn parse_dollars(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
        if digits.is_empty() {
            return None;
        }
        let cleaned: String = digits.chars().filter(|c| *c != ',').collect();
        Decimal::from_str(&cleaned).ok().and_then(Self::new)
    }

    /// The underlying full-precision amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Amount rounded to cents, midpoint away from zero.
    #[must_use]
    pub fn round2(self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Multiply by a non-negative factor, keeping full precision.
    ///
    /// Returns `None` when the product does not fit in a `Decimal`.
    #[must_use]
    pub fn times(self, factor: Decimal) -> Option<Self> {
        self.0
            .checked_mul(factor)
            .map(|amount| Self(amount.max(Decimal::ZERO)))
    }

    /// Multiply by a line quantity, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn scaled(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.round2())
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// A resolved price component: either an amount or the `Unknown` sentinel.
///
/// `Unknown` is never conflated with zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Price {
    Money(Money),
    #[default]
    Unknown,
}

impl Price {
    /// Parse a source display string: `"$X.YZ"` or `"N/A"`.
    ///
    /// Returns `None` when the string is neither, so adapters can report a
    /// malformed response instead of silently dropping the value.
    #[must_use]
    pub fn parse_display(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNKNOWN_PLACEHOLDER) {
            return Some(Self::Unknown);
        }
        Money::parse_dollars(trimmed).map(Self::Money)
    }

    #[must_use]
    pub const fn money(self) -> Option<Money> {
        match self {
            Self::Money(m) => Some(m),
            Self::Unknown => None,
        }
    }

    #[must_use]
    pub const fn is_known(self) -> bool {
        matches!(self, Self::Money(_))
    }

    #[must_use]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl From<Money> for Price {
    fn from(value: Money) -> Self {
        Self::Money(value)
    }
}

impl From<Option<Money>> for Price {
    fn from(value: Option<Money>) -> Self {
        value.map_or(Self::Unknown, Self::Money)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Money(m) => m.fmt(f),
            Self::Unknown => f.write_str(UNKNOWN_PLACEHOLDER),
        }
    }
}
