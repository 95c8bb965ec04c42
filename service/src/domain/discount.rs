//! [`Discount`] definitions.

use common::{Date, DateOf, Percent};
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

/// Time-limited discount offer applying to new contracts.
#[derive(Clone, Debug)]
pub struct Discount {
    /// ID of this [`Discount`].
    pub id: Id,

    /// [`Name`] of this [`Discount`].
    pub name: Name,

    /// [`Offer`] text of this [`Discount`].
    pub offer: Offer,

    /// [`Percent`] this [`Discount`] takes off the base price.
    pub percent: Percent,

    /// First [`Date`] this [`Discount`] is active on (inclusive).
    pub starts_on: ValidityDate,

    /// Last [`Date`] this [`Discount`] is active on (inclusive).
    pub ends_on: ValidityDate,
}

impl Discount {
    /// Returns whether this [`Discount`] is active on the provided [`Date`].
    #[must_use]
    pub fn is_active_on(&self, date: Date) -> bool {
        self.starts_on.coerce() <= date && date <= self.ends_on.coerce()
    }
}

/// Returns the best [`Percent`]age among the provided [`Discount`]s active
/// on the provided [`Date`].
///
/// [`Percent::ZERO`] is returned when no [`Discount`] is active, which is a
/// normal non-error outcome. Offers with an equal percentage are
/// indistinguishable.
#[must_use]
pub fn best_percent<'d>(
    offers: impl IntoIterator<Item = &'d Discount>,
    on: Date,
) -> Percent {
    offers
        .into_iter()
        .filter(|d| d.is_active_on(on))
        .map(|d| d.percent)
        .max()
        .unwrap_or(Percent::ZERO)
}

/// ID of a [`Discount`].
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

/// Name of a [`Discount`].
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
        name.trim() == name && !name.is_empty() && name.len() <= 100
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Promotional text of a [`Discount`] offer.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Offer(String);

impl Offer {
    /// Creates a new [`Offer`] if the given value is valid.
    #[must_use]
    pub fn new(offer: impl Into<String>) -> Option<Self> {
        let offer = offer.into();
        Self::check(&offer).then_some(Self(offer))
    }

    /// Checks whether the given value is a valid [`Offer`].
    fn check(offer: impl AsRef<str>) -> bool {
        let offer = offer.as_ref();
        offer.trim() == offer && !offer.is_empty() && offer.len() <= 100
    }
}

impl FromStr for Offer {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Offer`")
    }
}

/// Marker type indicating [`Discount`] validity.
#[derive(Clone, Copy, Debug)]
pub struct Validity;

/// [`Date`] bounding the validity window of a [`Discount`].
pub type ValidityDate = DateOf<(Discount, Validity)>;

#[cfg(test)]
mod spec {
    use common::{Date, Percent};

    use super::{best_percent, Discount, Id, Name, Offer};

    fn date(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    fn discount(percent: u8, starts_on: &str, ends_on: &str) -> Discount {
        Discount {
            id: Id::default(),
            name: Name::new("Promo").unwrap(),
            offer: Offer::new("Limited offer").unwrap(),
            percent: Percent::from_int(percent),
            starts_on: date(starts_on).coerce(),
            ends_on: date(ends_on).coerce(),
        }
    }

    #[test]
    fn ignores_inactive_offers() {
        let offers = [
            discount(40, "01-01-2024", "31-01-2024"),
            discount(10, "01-03-2024", "31-03-2024"),
        ];

        assert_eq!(
            best_percent(&offers, date("15-02-2024")),
            Percent::ZERO,
        );
        assert_eq!(
            best_percent(&offers, date("15-03-2024")),
            Percent::from_int(10),
        );
    }

    #[test]
    fn picks_the_highest_active_percentage() {
        let offers = [
            discount(10, "01-03-2024", "31-03-2024"),
            discount(25, "15-03-2024", "20-03-2024"),
            discount(15, "01-01-2024", "31-12-2024"),
        ];

        assert_eq!(
            best_percent(&offers, date("16-03-2024")),
            Percent::from_int(25),
        );
        assert_eq!(
            best_percent(&offers, date("01-03-2024")),
            Percent::from_int(15),
        );
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let offers = [discount(10, "01-03-2024", "31-03-2024")];

        assert_eq!(
            best_percent(&offers, date("01-03-2024")),
            Percent::from_int(10),
        );
        assert_eq!(
            best_percent(&offers, date("31-03-2024")),
            Percent::from_int(10),
        );
        assert_eq!(
            best_percent(&offers, date("29-02-2024")),
            Percent::ZERO,
        );
        assert_eq!(
            best_percent(&offers, date("01-04-2024")),
            Percent::ZERO,
        );
    }

    #[test]
    fn no_offers_resolve_to_zero() {
        assert_eq!(best_percent(&[], date("15-02-2024")), Percent::ZERO);
    }
}
