//! [`Percent`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
use rust_decimal::Decimal;

/// Percentage in the `0..=100` range.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd,
)]
pub struct Percent(Decimal);

impl Percent {
    /// A zero [`Percent`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Percent`] by checking the provided value is
    /// greater than `0` and less than `100`.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        if val < Decimal::ZERO || val > Decimal::ONE_HUNDRED {
            None
        } else {
            Some(Self(val))
        }
    }

    /// Creates a new [`Percent`] from the provided whole number.
    ///
    /// # Panics
    ///
    /// If the provided value exceeds `100`.
    #[must_use]
    pub const fn from_int(val: u8) -> Self {
        assert!(val <= 100, "`Percent` value exceeds 100");
        Self(Decimal::from_parts(val as u32, 0, 0, false, 0))
    }

    /// Returns this [`Percent`]age of the provided `amount`.
    #[must_use]
    pub fn of(self, amount: Decimal) -> Decimal {
        amount * self.0 / Decimal::ONE_HUNDRED
    }

    /// Adds the `other` [`Percent`] to this one, saturating at `100`.
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self((self.0 + other.0).min(Decimal::ONE_HUNDRED))
    }
}

impl FromStr for Percent {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid percent value")
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::Percent;

    #[test]
    fn checks_range_on_creation() {
        assert!(Percent::new(Decimal::ZERO).is_some());
        assert!(Percent::new(Decimal::ONE_HUNDRED).is_some());
        assert!(Percent::new(Decimal::from(-1)).is_none());
        assert!(Percent::new(Decimal::from(101)).is_none());
    }

    #[test]
    fn takes_a_share_of_an_amount() {
        assert_eq!(
            Percent::from_int(10).of(Decimal::ONE_THOUSAND),
            Decimal::ONE_HUNDRED,
        );
        assert_eq!(Percent::ZERO.of(Decimal::ONE_THOUSAND), Decimal::ZERO);
    }

    #[test]
    fn saturates_at_one_hundred() {
        assert_eq!(
            Percent::from_int(98).saturating_add(Percent::from_int(5)),
            Percent::from_int(100),
        );
        assert_eq!(
            Percent::from_int(10).saturating_add(Percent::from_int(5)),
            Percent::from_int(15),
        );
    }
}
