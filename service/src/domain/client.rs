//! [`Client`] definitions.

use common::{unit, DateOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

/// Client contracting for software products.
#[derive(Clone, Debug)]
pub struct Client {
    /// ID of this [`Client`].
    pub id: Id,

    /// [`Email`] of this [`Client`].
    pub email: Email,

    /// Postal [`Address`] of this [`Client`].
    pub address: Address,

    /// [`PhoneNumber`] of this [`Client`].
    pub phone: PhoneNumber,

    /// [`Profile`] of this [`Client`].
    pub profile: Profile,

    /// [`Date`] when this [`Client`] was soft-deleted, if it was.
    ///
    /// A deleted [`Client`] is kept for bookkeeping, but cannot contract
    /// anymore.
    ///
    /// [`Date`]: common::Date
    pub deleted_on: Option<DeletionDate>,
}

impl Client {
    /// Returns whether this [`Client`] is soft-deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_on.is_some()
    }
}

/// Profile of a [`Client`].
///
/// Every [`Client`] is either a natural person or a company, never both and
/// never neither.
#[derive(Clone, Debug, From)]
pub enum Profile {
    #[doc(hidden)]
    Personal(Personal),
    #[doc(hidden)]
    Corporate(Corporate),
}

/// [`Profile`] of a [`Client`] being a natural person.
#[derive(Clone, Debug)]
pub struct Personal {
    /// First name of the person.
    pub first_name: Name,

    /// Last name of the person.
    pub last_name: Name,

    /// [`Pesel`] of the person.
    pub pesel: Pesel,
}

/// [`Profile`] of a [`Client`] being a company.
#[derive(Clone, Debug)]
pub struct Corporate {
    /// Name of the company.
    pub name: Name,

    /// [`Krs`] number of the company.
    pub krs: Krs,
}

/// ID of a [`Client`].
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

/// Email address of a [`Client`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given value is valid.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Option<Self> {
        let email = email.into();
        Self::check(&email).then_some(Self(email))
    }

    /// Checks whether the given value is a valid [`Email`].
    fn check(email: impl AsRef<str>) -> bool {
        let email = email.as_ref();
        email.trim() == email
            && email.len() <= 254
            && email.split_once('@').is_some_and(|(local, host)| {
                !local.is_empty() && !host.is_empty()
            })
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// Postal address of a [`Client`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Address(String);

impl Address {
    /// Creates a new [`Address`] if the given value is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given value is a valid [`Address`].
    fn check(address: impl AsRef<str>) -> bool {
        let address = address.as_ref();
        address.trim() == address
            && !address.is_empty()
            && address.len() <= 512
    }
}

impl FromStr for Address {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Address`")
    }
}

/// Phone number of a [`Client`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Creates a new [`PhoneNumber`] if the given value is valid.
    #[must_use]
    pub fn new(phone: impl Into<String>) -> Option<Self> {
        let phone = phone.into();
        Self::check(&phone).then_some(Self(phone))
    }

    /// Checks whether the given value is a valid [`PhoneNumber`].
    fn check(phone: impl AsRef<str>) -> bool {
        let digits = phone.as_ref().strip_prefix('+').unwrap_or(phone.as_ref());
        (7..=15).contains(&digits.len())
            && digits.bytes().all(|b| b.is_ascii_digit())
    }
}

impl FromStr for PhoneNumber {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `PhoneNumber`")
    }
}

/// Name of a person or a company in a [`Profile`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given value is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given value is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 120
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// PESEL number identifying a [`Personal`] client.
#[derive(Clone, Copy, Debug, Display, Eq, Into, PartialEq)]
pub struct Pesel(u64);

impl Pesel {
    /// Creates a new [`Pesel`] if the given value is an 11-digit number.
    #[must_use]
    pub fn new(num: u64) -> Option<Self> {
        (10_000_000_000..=99_999_999_999)
            .contains(&num)
            .then_some(Self(num))
    }
}

/// KRS number identifying a [`Corporate`] client.
#[derive(Clone, Copy, Debug, Display, Eq, Into, PartialEq)]
pub struct Krs(u64);

impl Krs {
    /// Creates a new [`Krs`] if the given value fits the 10-digit register
    /// format.
    #[must_use]
    pub fn new(num: u64) -> Option<Self> {
        (num <= 9_999_999_999).then_some(Self(num))
    }
}

/// [`Date`] when a [`Client`] was soft-deleted.
///
/// [`Date`]: common::Date
pub type DeletionDate = DateOf<(Client, unit::Deletion)>;
