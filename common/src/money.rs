//! [`Money`]-related definitions.

use std::{fmt, str::FromStr};

use rust_decimal::{prelude::ToPrimitive as _, Decimal};

/// Amount of money in some currency.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Money {
    /// Amount of this [`Money`].
    pub amount: Decimal,

    /// Currency [`Code`] of this amount.
    pub currency: Code,
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency } = self;
        if amount.is_integer() {
            write!(f, "{}{currency}", amount.to_i128().expect("integer"))
        } else {
            write!(f, "{amount}{currency}")
        }
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 {
            return Err("too short");
        }

        let (amount, currency) = s.split_at(s.len() - 3);
        let amount = Decimal::from_str(amount).map_err(|_| "invalid amount")?;
        let currency = Code::from_str(currency)?;

        Ok(Self { amount, currency })
    }
}

/// Three-letter currency code (e.g. `PLN`, `USD`).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Code([u8; 3]);

impl Code {
    /// Polish Zloty, the base currency all the prices are kept in.
    pub const PLN: Self = Self(*b"PLN");

    /// Returns the string representation of this [`Code`].
    #[expect(clippy::missing_panics_doc, reason = "ASCII is checked")]
    #[must_use]
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).expect("ASCII letters")
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Code {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes: [u8; 3] =
            s.as_bytes().try_into().map_err(|_| "invalid currency")?;
        if bytes.iter().all(u8::is_ascii_uppercase) {
            Ok(Self(bytes))
        } else {
            Err("invalid currency")
        }
    }
}

/// Quoted price of one unit of a foreign currency, expressed in the base
/// currency.
///
/// Converting a base amount into the foreign currency therefore divides by
/// the rate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExchangeRate(Decimal);

impl ExchangeRate {
    /// [`ExchangeRate`] of the base currency to itself.
    pub const BASE: Self = Self(Decimal::ONE);

    /// Creates a new [`ExchangeRate`] by checking the provided quote is
    /// positive.
    #[must_use]
    pub fn new(quote: Decimal) -> Option<Self> {
        (quote > Decimal::ZERO).then_some(Self(quote))
    }

    /// Converts the provided base-currency `amount` into the foreign
    /// currency this [`ExchangeRate`] quotes.
    #[must_use]
    pub fn to_foreign(self, amount: Decimal) -> Decimal {
        amount / self.0
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::{Code, ExchangeRate, Money};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(
            Money::from_str("123.45USD").unwrap(),
            Money {
                amount: decimal("123.45"),
                currency: Code::from_str("USD").unwrap(),
            },
        );

        assert_eq!(
            Money::from_str("123.45PLN").unwrap(),
            Money {
                amount: decimal("123.45"),
                currency: Code::PLN,
            },
        );

        assert!(Money::from_str("123.45").is_err());
        assert!(Money::from_str("123.45Us").is_err());
        assert!(Money::from_str("123.45usd").is_err());
        assert!(Money::from_str("123.45Usdollar").is_err());

        assert!(Money::from_str("123.00USD").is_ok());
        assert!(Money::from_str("123.0USD").is_ok());
        assert!(Money::from_str("123USD").is_ok());
    }

    #[test]
    fn to_string() {
        assert_eq!(
            Money {
                amount: decimal("123.45"),
                currency: Code::from_str("EUR").unwrap(),
            }
            .to_string(),
            "123.45EUR",
        );

        assert_eq!(
            Money {
                amount: decimal("123.00"),
                currency: Code::PLN,
            }
            .to_string(),
            "123PLN",
        );
        assert_eq!(
            Money {
                amount: decimal("123"),
                currency: Code::PLN,
            }
            .to_string(),
            "123PLN",
        );
    }

    #[test]
    fn rate_divides_base_into_foreign() {
        let rate = ExchangeRate::new(decimal("4")).unwrap();
        assert_eq!(rate.to_foreign(decimal("1000")), decimal("250"));

        assert_eq!(
            ExchangeRate::BASE.to_foreign(decimal("1000")),
            decimal("1000"),
        );

        assert!(ExchangeRate::new(Decimal::ZERO).is_none());
        assert!(ExchangeRate::new(decimal("-1")).is_none());
    }
}
