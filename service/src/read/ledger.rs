//! Ledger read model definition.

use derive_more::{From, Into};
use rust_decimal::Decimal;

#[cfg(doc)]
use crate::domain::{ledger::Entry, Contract};

/// Sum of all the ledger [`Entry`] amounts of a single [`Contract`].
#[derive(Clone, Copy, Debug, Eq, From, Into, PartialEq, PartialOrd)]
pub struct Total(Decimal);
