//! [`Subscription`] [`Contract`] model definition.

use std::ops::RangeInclusive;

use common::Date;

#[cfg(doc)]
use crate::domain::Contract;

use super::SigningDate;

/// [`Contract`] model billed in full every renewal period, indefinitely.
///
/// The first payment is collected at signing, so the ledger of a
/// [`Subscription`] [`Contract`] is never empty.
#[derive(Clone, Copy, Debug)]
pub struct Subscription {
    /// [`RenewalPeriod`] of the [`Contract`].
    pub renewal_period: RenewalPeriod,
}

impl Subscription {
    /// Returns the inclusive window of [`Date`]s the payment with the
    /// provided 0-based `ordinal` is accepted within.
    ///
    /// Windows are laid out back-to-back from the [`Contract`] signing
    /// [`Date`], one renewal period each: the payment made at signing owns
    /// the window `0`, the first renewal owns the window `1`, and so on.
    #[must_use]
    pub fn billing_window(
        &self,
        signed_on: SigningDate,
        ordinal: u32,
    ) -> RangeInclusive<Date> {
        let months = i32::from(self.renewal_period.months());
        let shift =
            months.saturating_mul(i32::try_from(ordinal).unwrap_or(i32::MAX));
        let opens = signed_on.coerce::<()>().add_months(shift);
        opens..=opens.add_months(months)
    }
}

/// Number of months between [`Subscription`] renewals.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct RenewalPeriod(u8);

impl RenewalPeriod {
    /// Minimal allowed [`RenewalPeriod`].
    pub const MIN: Self = Self(1);

    /// Maximal allowed [`RenewalPeriod`].
    pub const MAX: Self = Self(24);

    /// Creates a new [`RenewalPeriod`] by checking the provided number of
    /// `months` is within the allowed bounds.
    #[must_use]
    pub fn new(months: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&months)
            .then_some(Self(months))
    }

    /// Returns the number of months of this [`RenewalPeriod`].
    #[must_use]
    pub fn months(self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod spec {
    use common::Date;

    use super::{RenewalPeriod, Subscription};

    fn date(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    #[test]
    fn bounds_renewal_period() {
        assert!(RenewalPeriod::new(0).is_none());
        assert!(RenewalPeriod::new(1).is_some());
        assert!(RenewalPeriod::new(24).is_some());
        assert!(RenewalPeriod::new(25).is_none());
    }

    #[test]
    fn lays_billing_windows_back_to_back() {
        let sub = Subscription {
            renewal_period: RenewalPeriod::new(6).unwrap(),
        };
        let signed_on = date("01-01-2024").coerce();

        assert_eq!(
            sub.billing_window(signed_on, 0),
            date("01-01-2024")..=date("01-07-2024"),
        );
        assert_eq!(
            sub.billing_window(signed_on, 1),
            date("01-07-2024")..=date("01-01-2025"),
        );
        assert_eq!(
            sub.billing_window(signed_on, 3),
            date("01-07-2025")..=date("01-01-2026"),
        );
    }
}
