//! [`Query`] collection computing profit over the payment ledger.

use std::collections::HashMap;

use common::{
    money::{self, ExchangeRate},
    operations::{By, Select},
    Date, Money,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{
        contract::{self, one_time, Model},
        ledger, software, Contract, Software,
    },
    infra::{database, rates, Database},
    Query, Service,
};

use super::rate;

/// [`Query`] computing the realized profit over the payment ledger.
///
/// Counts the ledger of every subscription [`Contract`] and of the one-time
/// ones that are fully paid off. The total is reported in the requested
/// currency.
#[derive(Clone, Copy, Debug)]
pub struct Realized {
    /// ID of the [`Software`] to narrow the computation to.
    ///
    /// [`None`] means all the [`Software`] products.
    pub software_id: Option<software::Id>,

    /// Currency to report the profit in.
    pub currency: money::Code,
}

/// [`Query`] computing the predicted profit over a future horizon.
///
/// Starts from the [`Realized`] total and adds, for every subscription
/// [`Contract`], the full [`Contract`] price per each whole renewal period
/// fitting between its paid-through [`Date`] and the horizon end.
#[derive(Clone, Copy, Debug)]
pub struct Predicted {
    /// ID of the [`Software`] to narrow the computation to.
    ///
    /// [`None`] means all the [`Software`] products.
    pub software_id: Option<software::Id>,

    /// Currency to report the profit in.
    pub currency: money::Code,

    /// Number of months to look ahead.
    pub horizon_months: u16,

    /// [`Date`] the horizon starts on.
    pub as_of: Date,
}

impl<Db, Rp> Query<Realized> for Service<Db, Rp>
where
    Self: Query<
        rate::Current,
        Ok = ExchangeRate,
        Err = Traced<rates::Error>,
    >,
    Db: Database<
            Select<By<Option<Software>, software::Id>>,
            Ok = Option<Software>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Contract>, Option<software::Id>>>,
            Ok = Vec<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<
                    HashMap<contract::Id, Vec<ledger::Entry>>,
                    Vec<contract::Id>,
                >,
            >,
            Ok = HashMap<contract::Id, Vec<ledger::Entry>>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Money;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, query: Realized) -> Result<Self::Ok, Self::Err> {
        let Realized {
            software_id,
            currency,
        } = query;

        let (contracts, payments) =
            ledger_of(self, software_id).await?;
        let rate = self
            .execute(rate::Current { currency })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?;

        Ok(Money {
            amount: rate.to_foreign(earned_total(&contracts, &payments)),
            currency,
        })
    }
}

impl<Db, Rp> Query<Predicted> for Service<Db, Rp>
where
    Self: Query<
        rate::Current,
        Ok = ExchangeRate,
        Err = Traced<rates::Error>,
    >,
    Db: Database<
            Select<By<Option<Software>, software::Id>>,
            Ok = Option<Software>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Contract>, Option<software::Id>>>,
            Ok = Vec<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<
                    HashMap<contract::Id, Vec<ledger::Entry>>,
                    Vec<contract::Id>,
                >,
            >,
            Ok = HashMap<contract::Id, Vec<ledger::Entry>>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Money;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, query: Predicted) -> Result<Self::Ok, Self::Err> {
        let Predicted {
            software_id,
            currency,
            horizon_months,
            as_of,
        } = query;

        let (contracts, payments) =
            ledger_of(self, software_id).await?;
        let rate = self
            .execute(rate::Current { currency })
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?;

        let horizon_end = as_of.add_months(i32::from(horizon_months));
        let projected: Decimal = contracts
            .iter()
            .filter_map(|c| {
                let Model::Subscription(m) = &c.model else {
                    return None;
                };
                let count = payments.get(&c.id).map_or(0, Vec::len);
                let months = i32::from(m.renewal_period.months());
                let paid_through =
                    c.signed_on.coerce::<()>().add_months(
                        months.saturating_mul(
                            i32::try_from(count).unwrap_or(i32::MAX),
                        ),
                    );
                let remaining = paid_through.months_until(horizon_end);
                (remaining > 0).then(|| {
                    c.price.amount() * Decimal::from(remaining / months)
                })
            })
            .sum();

        Ok(Money {
            amount: rate
                .to_foreign(earned_total(&contracts, &payments) + projected),
            currency,
        })
    }
}

/// Selects the [`Contract`]s to aggregate over, with their ledgers.
///
/// The provided [`software::Id`] is re-validated first: aggregating over an
/// unknown [`Software`] is reported, not silently zeroed.
async fn ledger_of<Db, Rp>(
    service: &Service<Db, Rp>,
    software_id: Option<software::Id>,
) -> Result<
    (Vec<Contract>, HashMap<contract::Id, Vec<ledger::Entry>>),
    Traced<ExecutionError>,
>
where
    Db: Database<
            Select<By<Option<Software>, software::Id>>,
            Ok = Option<Software>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Contract>, Option<software::Id>>>,
            Ok = Vec<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<
                    HashMap<contract::Id, Vec<ledger::Entry>>,
                    Vec<contract::Id>,
                >,
            >,
            Ok = HashMap<contract::Id, Vec<ledger::Entry>>,
            Err = Traced<database::Error>,
        >,
{
    use ExecutionError as E;

    if let Some(id) = software_id {
        service
            .database()
            .execute(Select(By::<Option<Software>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SoftwareNotExists(id))
            .map_err(tracerr::wrap!())
            .map(drop)?;
    }

    let contracts = service
        .database()
        .execute(Select(By::<Vec<Contract>, _>::new(software_id)))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))?;
    let ids = contracts.iter().map(|c| c.id).collect::<Vec<_>>();
    let payments = service
        .database()
        .execute(Select(By::<
            HashMap<contract::Id, Vec<ledger::Entry>>,
            _,
        >::new(ids)))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))?;

    Ok((contracts, payments))
}

/// Sums the ledgers of the [`Contract`]s whose payments count as earned:
/// every subscription one, and the one-time ones that are fully paid off.
fn earned_total(
    contracts: &[Contract],
    payments: &HashMap<contract::Id, Vec<ledger::Entry>>,
) -> Decimal {
    contracts
        .iter()
        .filter(|c| match &c.model {
            Model::Subscription(_) => true,
            Model::OneTime(m) => m.status == one_time::Status::Active,
        })
        .map(|c| {
            payments
                .get(&c.id)
                .map_or(Decimal::ZERO, |entries| ledger::total(entries))
        })
        .sum()
}

/// Error of [`Realized`] or [`Predicted`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`rates::Error`] of resolving the exchange rate.
    #[display("exchange rate lookup failed: {_0}")]
    #[from]
    Rates(rates::Error),

    /// [`Software`] with the provided ID does not exist.
    #[display("`Software(id: {_0})` does not exist")]
    SoftwareNotExists(#[error(not(source))] software::Id),
}
