//! Calendar date utilities.

use std::{cmp::Ordering, fmt, marker::PhantomData, str::FromStr};

use derive_more::{Debug, Display, Error};
use time::{
    format_description::BorrowedFormatItem, macros::format_description, Month,
};

/// Format all textual dates are exchanged in.
const FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day]-[month]-[year]");

/// Untyped calendar date.
pub type Date = DateOf;

/// Calendar date (no time-of-day component).
#[derive(Debug)]
pub struct DateOf<Of: ?Sized = ()> {
    /// Inner representation of the date.
    inner: time::Date,

    /// Type parameter describing the kind of date.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateOf<Of> {
    /// Creates a new [`Date`] representing the current day in UTC.
    #[must_use]
    pub fn today() -> Self {
        Self {
            inner: time::OffsetDateTime::now_utc().date(),
            _of: PhantomData,
        }
    }

    /// Creates a new [`Date`] from the provided `dd-MM-yyyy` string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid date in the `dd-MM-yyyy`
    /// format. No other format is accepted.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        time::Date::parse(input, FORMAT)
            .map(Self::from_inner)
            .map_err(ParseError::Parse)
    }

    /// Shifts this [`Date`] by the provided number of calendar `months`.
    ///
    /// The day-of-month is clamped to the length of the resulting month
    /// (e.g. 31 January plus one month is 28/29 February).
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn add_months(self, months: i32) -> Self {
        let zero_based =
            i32::from(u8::from(self.inner.month())) - 1 + months;
        let year = self.inner.year() + zero_based.div_euclid(12);
        let month = u8::try_from(zero_based.rem_euclid(12) + 1)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .expect("in `1..=12` range");
        let day = self.inner.day().min(days_in_month(year, month));
        Self::from_inner(
            time::Date::from_calendar_date(year, month, day)
                .expect("day clamped to the month length"),
        )
    }

    /// Returns the number of whole days from this [`Date`] until the `other`
    /// one.
    ///
    /// Negative if the `other` [`Date`] is in the past.
    #[must_use]
    pub fn whole_days_until(self, other: Self) -> i64 {
        (other.inner - self.inner).whole_days()
    }

    /// Returns the number of calendar months from this [`Date`] until the
    /// `other` one, ignoring the days-of-month.
    ///
    /// Negative if the `other` [`Date`] is in an earlier month.
    #[must_use]
    pub fn months_until(self, other: Self) -> i32 {
        (other.inner.year() - self.inner.year()) * 12
            + i32::from(u8::from(other.inner.month()))
            - i32::from(u8::from(self.inner.month()))
    }

    /// Coerces one kind of [`Date`] into another.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateOf<NewOf> {
        DateOf::from_inner(self.inner)
    }

    /// Wraps the provided [`time::Date`].
    fn from_inner(inner: time::Date) -> Self {
        Self {
            inner,
            _of: PhantomData,
        }
    }
}

/// Returns the number of days in the provided month.
fn days_in_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if time::util::is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

/// Error of parsing a [`Date`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ParseError {
    /// Failed to parse the string as a `dd-MM-yyyy` date.
    Parse(time::error::Parse),
}

impl<Of: ?Sized> fmt::Display for DateOf<Of> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self.inner.format(FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&formatted)
    }
}

impl<Of: ?Sized> FromStr for DateOf<Of> {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<Of: ?Sized> Copy for DateOf<Of> {}
impl<Of: ?Sized> Clone for DateOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateOf<Of> {}
impl<Of: ?Sized> PartialEq for DateOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Ord for DateOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> From<DateOf<Of>> for time::Date {
    fn from(date: DateOf<Of>) -> Self {
        date.inner
    }
}
