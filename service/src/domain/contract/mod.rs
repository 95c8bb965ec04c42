//! [`Contract`] definitions.

pub mod one_time;
pub mod subscription;

use common::{define_kind, Date, DateOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{client, ledger, software};
#[cfg(doc)]
use crate::domain::{Client, Software};

pub use self::{one_time::OneTime, subscription::Subscription};

/// Agreement of a [`Client`] to pay for a [`Software`] product.
#[derive(Clone, Debug)]
pub struct Contract {
    /// ID of this [`Contract`].
    pub id: Id,

    /// ID of the [`Client`] owning this [`Contract`].
    pub client_id: client::Id,

    /// ID of the [`Software`] this [`Contract`] is about.
    pub software_id: software::Id,

    /// [`Name`] of this [`Contract`].
    pub name: Name,

    /// Final [`Price`] of this [`Contract`], with all the discounts and
    /// surcharges already applied.
    pub price: Price,

    /// [`Date`] this [`Contract`] was signed on.
    pub signed_on: SigningDate,

    /// Payment [`Model`] of this [`Contract`].
    pub model: Model,
}

/// Payment model of a [`Contract`], selected at its creation and immutable
/// afterwards.
#[derive(Clone, Debug, From)]
pub enum Model {
    #[doc(hidden)]
    OneTime(OneTime),
    #[doc(hidden)]
    Subscription(Subscription),
}

impl Contract {
    /// Returns [`Kind`] of this [`Contract`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match &self.model {
            Model::OneTime(_) => Kind::OneTime,
            Model::Subscription(_) => Kind::Subscription,
        }
    }

    /// Returns the [`Date`] when this [`Contract`] expires.
    ///
    /// [`None`] means that this [`Contract`] renews indefinitely.
    #[must_use]
    pub fn expires_on(&self) -> Option<ExpirationDate> {
        match &self.model {
            Model::OneTime(m) => Some(m.expires_on),
            Model::Subscription(_) => None,
        }
    }

    /// Returns the [`OneTime`] model of this [`Contract`], if it has one.
    #[must_use]
    pub fn as_one_time(&self) -> Option<&OneTime> {
        match &self.model {
            Model::OneTime(m) => Some(m),
            Model::Subscription(_) => None,
        }
    }

    /// Returns the [`Subscription`] model of this [`Contract`], if it has
    /// one.
    #[must_use]
    pub fn as_subscription(&self) -> Option<&Subscription> {
        match &self.model {
            Model::Subscription(m) => Some(m),
            Model::OneTime(_) => None,
        }
    }

    /// Returns whether this [`Contract`] still claims its [`Software`] for
    /// the owning [`Client`] on the provided [`Date`].
    ///
    /// A [`OneTime`] [`Contract`] claims until its expiry. A
    /// [`Subscription`] one claims while the latest of the provided ledger
    /// `payments` is within one renewal period of the `as_of` [`Date`]
    /// (falling back to the signing [`Date`] if the ledger is empty).
    ///
    /// While a claim is held, no other [`Contract`] for the same
    /// [`Client`]+[`Software`] pair may be created.
    #[must_use]
    pub fn has_active_claim(
        &self,
        payments: &[ledger::Entry],
        as_of: Date,
    ) -> bool {
        match &self.model {
            Model::OneTime(m) => m.expires_on.coerce() >= as_of,
            Model::Subscription(m) => {
                let last_paid_on = payments
                    .iter()
                    .map(|e| e.paid_on.coerce())
                    .max()
                    .unwrap_or_else(|| self.signed_on.coerce());
                let months = i32::from(m.renewal_period.months());
                as_of <= last_paid_on.add_months(months)
            }
        }
    }
}

/// ID of a [`Contract`].
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

/// Name of a [`Contract`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Price of a [`Contract`] in whole base-currency units.
#[derive(
    Clone, Copy, Debug, Display, Eq, Into, Ord, PartialEq, PartialOrd,
)]
pub struct Price(Decimal);

impl Price {
    /// Creates a new [`Price`] by checking the provided amount is not
    /// negative.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (amount >= Decimal::ZERO).then_some(Self(amount))
    }

    /// Returns the amount of this [`Price`].
    #[must_use]
    pub fn amount(self) -> Decimal {
        self.0
    }
}

define_kind! {
    #[doc = "Kind of a [`Contract`]."]
    enum Kind {
        #[doc = "[`OneTime`] [`Contract`]."]
        OneTime = 1,

        #[doc = "[`Subscription`] [`Contract`]."]
        Subscription = 2,
    }
}

/// Marker type indicating [`Contract`] signing.
#[derive(Clone, Copy, Debug)]
pub struct Signing;

/// [`Date`] when a [`Contract`] was signed.
pub type SigningDate = DateOf<(Contract, Signing)>;

/// Marker type indicating [`Contract`] expiration.
#[derive(Clone, Copy, Debug)]
pub struct Expiration;

/// [`Date`] when a [`Contract`] expires.
pub type ExpirationDate = DateOf<(Contract, Expiration)>;
