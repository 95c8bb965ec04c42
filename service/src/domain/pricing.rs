//! [`Contract`] pricing rules.

use common::Percent;
use rust_decimal::Decimal;

use crate::domain::contract::{one_time, Price};
#[cfg(doc)]
use crate::domain::Contract;

/// Extra discount [`Percent`]age points granted to a client already holding
/// at least one [`Contract`].
const LOYALTY_BONUS: Percent = Percent::from_int(5);

/// Flat fee charged per each update-coverage year beyond the first one.
const UPDATE_FEE_PER_YEAR: Decimal = Decimal::ONE_THOUSAND;

/// Prices a new one-time [`Contract`].
///
/// The best active discount (boosted for a returning client) is taken off
/// the `base` [`Price`] first, then the update-coverage surcharge is added
/// on top.
#[expect(clippy::missing_panics_doc, reason = "cannot go negative")]
#[must_use]
pub fn one_time(
    base: Price,
    discount: Percent,
    returning_client: bool,
    update_period: one_time::UpdatePeriod,
) -> Price {
    let surcharge = UPDATE_FEE_PER_YEAR
        * Decimal::from(update_period.additional_years());
    Price::new(discounted(base, discount, returning_client) + surcharge)
        .expect("discount is capped at 100%")
}

/// Prices a new subscription [`Contract`].
///
/// Same as [`one_time()`], but without any surcharge: the resulting
/// [`Price`] is collected in full every renewal period.
#[expect(clippy::missing_panics_doc, reason = "cannot go negative")]
#[must_use]
pub fn subscription(
    base: Price,
    discount: Percent,
    returning_client: bool,
) -> Price {
    Price::new(discounted(base, discount, returning_client))
        .expect("discount is capped at 100%")
}

/// Applies the `discount` to the `base` [`Price`].
///
/// A returning client gets [`LOYALTY_BONUS`] extra percentage points folded
/// into the discount before it applies. This is the only loyalty
/// adjustment: no separate multiplicative cut exists.
fn discounted(
    base: Price,
    discount: Percent,
    returning_client: bool,
) -> Decimal {
    let discount = if returning_client {
        discount.saturating_add(LOYALTY_BONUS)
    } else {
        discount
    };
    let base = base.amount();
    base - discount.of(base)
}
