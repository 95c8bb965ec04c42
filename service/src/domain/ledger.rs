//! Payment ledger definitions.

use common::{unit, DateOf};
use derive_more::{Display, From, FromStr, Into};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::contract;
#[cfg(doc)]
use crate::domain::Contract;

/// Single payment recorded against a [`Contract`].
///
/// The ledger is append-only: entries are never updated nor deleted.
#[derive(Clone, Copy, Debug)]
pub struct Entry {
    /// ID of this [`Entry`].
    pub id: Id,

    /// ID of the [`Contract`] paid for.
    pub contract_id: contract::Id,

    /// [`Amount`] paid.
    pub amount: Amount,

    /// [`Date`] the payment was made on.
    ///
    /// [`Date`]: common::Date
    pub paid_on: PaymentDate,
}

/// Sums up the [`Amount`]s of the provided [`Entry`]s.
#[must_use]
pub fn total<'e>(entries: impl IntoIterator<Item = &'e Entry>) -> Decimal {
    entries
        .into_iter()
        .map(|e| Decimal::from(e.amount))
        .sum()
}

/// ID of a ledger [`Entry`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
pub struct Id(i32);

/// Amount of money paid in a single ledger [`Entry`], in whole
/// base-currency units.
#[derive(Clone, Copy, Debug, Display, Eq, Into, Ord, PartialEq, PartialOrd)]
pub struct Amount(Decimal);

impl Amount {
    /// Creates a new [`Amount`] by checking the provided value is positive.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (amount > Decimal::ZERO).then_some(Self(amount))
    }
}

/// [`Date`] when a ledger [`Entry`] was created.
///
/// [`Date`]: common::Date
pub type PaymentDate = DateOf<(Entry, unit::Creation)>;
