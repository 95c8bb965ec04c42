//! [`Query`] resolving an exchange rate.

use common::{
    money::{Code, ExchangeRate},
    operations::{By, Select},
};
use tracerr::Traced;

use crate::{
    infra::{rates, Rates},
    Query, Service,
};

/// [`Query`] resolving the current [`ExchangeRate`] of a currency.
///
/// The base currency always resolves to [`ExchangeRate::BASE`] without
/// consulting the [`Rates`] source; any other currency must be quoted by
/// it, or the whole [`Query`] fails.
#[derive(Clone, Copy, Debug)]
pub struct Current {
    /// [`Code`] of the currency to resolve.
    pub currency: Code,
}

impl<Db, Rp> Query<Current> for Service<Db, Rp>
where
    Rp: Rates<
        Select<By<ExchangeRate, Code>>,
        Ok = ExchangeRate,
        Err = Traced<rates::Error>,
    >,
{
    type Ok = ExchangeRate;
    type Err = Traced<rates::Error>;

    async fn execute(
        &self,
        Current { currency }: Current,
    ) -> Result<Self::Ok, Self::Err> {
        if currency == self.config().base_currency {
            return Ok(ExchangeRate::BASE);
        }
        self.rates()
            .execute(Select(By::new(currency)))
            .await
            .map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use std::{
        str::FromStr as _,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use common::{
        money::{Code, ExchangeRate},
        operations::{By, Select},
    };
    use rust_decimal::Decimal;
    use tracerr::Traced;

    use crate::{
        infra::{database::InMemory, rates, Rates},
        Config, Service,
    };

    use super::{Current, Query as _};

    /// [`Rates`] source counting how many times it was consulted.
    #[derive(Debug, Default)]
    struct Counting(AtomicUsize);

    impl Rates<Select<By<ExchangeRate, Code>>> for Counting {
        type Ok = ExchangeRate;
        type Err = Traced<rates::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<ExchangeRate, Code>>,
        ) -> Result<Self::Ok, Self::Err> {
            let _ = self.0.fetch_add(1, Ordering::SeqCst);
            Err(tracerr::new!(rates::Error::UnknownCurrency(
                by.into_inner(),
            )))
        }
    }

    #[tokio::test]
    async fn base_currency_never_reaches_the_source() {
        let svc =
            Service::new(Config::default(), InMemory::new(), Counting::default());

        let rate = svc
            .execute(Current { currency: Code::PLN })
            .await
            .unwrap();

        assert_eq!(rate, ExchangeRate::BASE);
        assert_eq!(svc.rates().0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn foreign_currency_is_quoted_by_the_source() {
        let usd = Code::from_str("USD").unwrap();
        let svc = Service::new(
            Config::default(),
            InMemory::new(),
            rates::Table::new([(
                usd,
                ExchangeRate::new(Decimal::from(4)).unwrap(),
            )]),
        );

        let rate = svc.execute(Current { currency: usd }).await.unwrap();
        assert_eq!(rate, ExchangeRate::new(Decimal::from(4)).unwrap());

        let eur = Code::from_str("EUR").unwrap();
        let err = svc.execute(Current { currency: eur }).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            rates::Error::UnknownCurrency(_),
        ));
    }
}
