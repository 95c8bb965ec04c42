//! [`OneTime`] [`Contract`] model definition.

use strum::Display;

use crate::domain::software;
#[cfg(doc)]
use crate::domain::{ledger, Contract};

use super::ExpirationDate;

/// [`Contract`] model paid incrementally up to its fixed price.
///
/// Starts [`Status::Inactive`] and becomes [`Status::Active`] once the
/// [`ledger`] payments sum up to the [`Contract`] price exactly.
#[derive(Clone, Debug)]
pub struct OneTime {
    /// [`software::Version`] sold under the [`Contract`].
    pub version: software::Version,

    /// [`Date`] the [`Contract`] expires on (inclusive). No payments are
    /// accepted past it.
    ///
    /// [`Date`]: common::Date
    pub expires_on: ExpirationDate,

    /// [`Status`] of the [`Contract`].
    pub status: Status,

    /// [`UpdatePeriod`] the [`Contract`] price covers.
    pub update_period: UpdatePeriod,
}

/// Status of a [`OneTime`] [`Contract`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[repr(u8)]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    /// Payments are still being collected.
    Inactive = 1,

    /// The [`Contract`] is fully paid off. Terminal.
    Active = 2,
}

/// Number of years a [`OneTime`] [`Contract`] covers software updates for.
///
/// Every year beyond the first one is surcharged on top of the discounted
/// price.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct UpdatePeriod(u8);

impl UpdatePeriod {
    /// Minimal allowed [`UpdatePeriod`].
    pub const MIN: Self = Self(1);

    /// Maximal allowed [`UpdatePeriod`].
    pub const MAX: Self = Self(4);

    /// Creates a new [`UpdatePeriod`] by checking the provided number of
    /// `years` is within the allowed bounds.
    #[must_use]
    pub fn new(years: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0).contains(&years).then_some(Self(years))
    }

    /// Returns the number of years of this [`UpdatePeriod`].
    #[must_use]
    pub fn years(self) -> u8 {
        self.0
    }

    /// Returns the number of surcharged years, i.e. the ones beyond the
    /// first.
    #[must_use]
    pub fn additional_years(self) -> u8 {
        self.0 - 1
    }
}
