//! [`Contract`] read model definition.

use common::Date;
use derive_more::{From, Into};

use crate::domain::{client, software};
#[cfg(doc)]
use crate::domain::{Client, Contract, Software};

/// Wrapper around a [`Contract`] indicating that it holds an active claim.
///
/// See [`Contract::has_active_claim()`] for the claiming rules.
#[derive(Clone, Copy, Debug)]
pub struct Active<T>(pub T);

/// Key selecting a [`Contract`] actively claiming a [`Software`] for a
/// [`Client`] on the given [`Date`].
#[derive(Clone, Copy, Debug)]
pub struct Claim {
    /// ID of the [`Client`] to check.
    pub client_id: client::Id,

    /// ID of the [`Software`] to check.
    pub software_id: software::Id,

    /// [`Date`] to check the claim on.
    pub as_of: Date,
}

/// Total count of [`Contract`]s.
#[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
pub struct TotalCount(i32);

impl TotalCount {
    /// Returns whether the count is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}
