//! [`Table`]-backed [`Rates`] source.

use std::collections::HashMap;

use common::{
    money::{Code, ExchangeRate},
    operations::{By, Select},
};
use tracerr::Traced;

use crate::infra::rates::{Error, Rates};

/// [`Rates`] source backed by a fixed table of quotes.
///
/// Deterministic: quotes exactly what it was built with and performs no
/// I/O, which also makes it the test double for anything consuming
/// exchange rates.
#[derive(Clone, Debug, Default)]
pub struct Table(HashMap<Code, ExchangeRate>);

impl Table {
    /// Creates a new [`Table`] from the provided quotes.
    #[must_use]
    pub fn new(
        quotes: impl IntoIterator<Item = (Code, ExchangeRate)>,
    ) -> Self {
        Self(quotes.into_iter().collect())
    }
}

impl Rates<Select<By<ExchangeRate, Code>>> for Table {
    type Ok = ExchangeRate;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<ExchangeRate, Code>>,
    ) -> Result<Self::Ok, Self::Err> {
        let code = by.into_inner();
        self.0
            .get(&code)
            .copied()
            .ok_or_else(|| tracerr::new!(Error::UnknownCurrency(code)))
    }
}
