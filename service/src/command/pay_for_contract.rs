//! [`Command`] for paying for a [`Contract`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    Date,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        contract::{self, one_time, Model},
        ledger, Contract,
    },
    infra::{database, Database},
    read,
    Service,
};

use super::Command;

/// [`Command`] for paying for a [`Contract`].
///
/// Validates the payment against the temporal and monetary constraints of
/// the [`Contract`]'s payment [`Model`] and, once accepted, appends it to
/// the ledger. Nothing is written for a rejected payment.
#[derive(Clone, Copy, Debug)]
pub struct PayForContract {
    /// ID of the [`Contract`] to pay for.
    pub contract_id: contract::Id,

    /// Amount of money paid, in whole base-currency units.
    pub amount: Decimal,

    /// [`Date`] the payment is made on.
    pub paid_on: ledger::PaymentDate,
}

impl<Db, Rp> Command<PayForContract> for Service<Db, Rp>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Contract, contract::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<ledger::Entry>, contract::Id>>,
            Ok = Vec<ledger::Entry>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::ledger::Total, contract::Id>>,
            Ok = read::ledger::Total,
            Err = Traced<database::Error>,
        > + Database<
            Insert<ledger::Entry>,
            Ok = ledger::Entry,
            Err = Traced<database::Error>,
        > + Database<Update<Contract>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ledger::Entry;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: PayForContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let PayForContract {
            contract_id,
            amount,
            paid_on,
        } = cmd;

        self.database()
            .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent payments upon the same `Contract`.
        tx.execute(Lock(By::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        // Re-read under the lock: the pre-transaction snapshot could be
        // outrun by another payment.
        let contract = tx
            .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;

        let entry = match &contract.model {
            Model::OneTime(model) => {
                pay_one_time(&tx, &contract, model, amount, paid_on).await?
            }
            Model::Subscription(model) => {
                pay_subscription(&tx, &contract, model, amount, paid_on)
                    .await?
            }
        };

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(entry)
    }
}

/// Validates and records a payment for a one-time [`Contract`].
async fn pay_one_time<Db>(
    tx: &Db,
    contract: &Contract,
    model: &one_time::OneTime,
    amount: Decimal,
    paid_on: ledger::PaymentDate,
) -> Result<ledger::Entry, Traced<ExecutionError>>
where
    Db: Database<
            Select<By<read::ledger::Total, contract::Id>>,
            Ok = read::ledger::Total,
            Err = Traced<database::Error>,
        > + Database<
            Insert<ledger::Entry>,
            Ok = ledger::Entry,
            Err = Traced<database::Error>,
        > + Database<Update<Contract>, Ok = (), Err = Traced<database::Error>>,
{
    use ExecutionError as E;

    if paid_on.coerce::<()>() > model.expires_on.coerce() {
        return Err(tracerr::new!(E::Overdue {
            expired_on: model.expires_on,
        }));
    }
    if model.status == one_time::Status::Active {
        return Err(tracerr::new!(E::AlreadyPaidOff(contract.id)));
    }

    let amount = ledger::Amount::new(amount)
        .ok_or(E::NonPositiveAmount)
        .map_err(tracerr::wrap!())?;
    let paid = Decimal::from(
        tx.execute(Select(By::<read::ledger::Total, _>::new(contract.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?,
    );
    let price = contract.price.amount();
    if paid + Decimal::from(amount) > price {
        return Err(tracerr::new!(E::Overpayment {
            outstanding: price - paid,
        }));
    }

    let entry = tx
        .execute(Insert(ledger::Entry {
            id: ledger::Id::default(),
            contract_id: contract.id,
            amount,
            paid_on,
        }))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))?;

    if paid + Decimal::from(amount) == price {
        let mut paid_off = contract.clone();
        if let Model::OneTime(m) = &mut paid_off.model {
            m.status = one_time::Status::Active;
        }
        tx.execute(Update(paid_off))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        log::info!(
            contract_id = %contract.id,
            "one-time contract is paid off and became active",
        );
    }

    Ok(entry)
}

/// Validates and records a renewal payment for a subscription [`Contract`].
async fn pay_subscription<Db>(
    tx: &Db,
    contract: &Contract,
    model: &contract::Subscription,
    amount: Decimal,
    paid_on: ledger::PaymentDate,
) -> Result<ledger::Entry, Traced<ExecutionError>>
where
    Db: Database<
            Select<By<Vec<ledger::Entry>, contract::Id>>,
            Ok = Vec<ledger::Entry>,
            Err = Traced<database::Error>,
        > + Database<
            Insert<ledger::Entry>,
            Ok = ledger::Entry,
            Err = Traced<database::Error>,
        >,
{
    use ExecutionError as E;

    let entries = tx
        .execute(Select(By::<Vec<ledger::Entry>, _>::new(contract.id)))
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))?;

    let ordinal = u32::try_from(entries.len()).unwrap_or(u32::MAX);
    let window = model.billing_window(contract.signed_on, ordinal);
    if !window.contains(&paid_on.coerce()) {
        return Err(tracerr::new!(E::OutsideBillingWindow {
            opens_on: *window.start(),
            closes_on: *window.end(),
        }));
    }

    // The previous period must have been paid on time itself: a missed one
    // blocks all the following renewals.
    if let Some(previous) = entries.iter().map(|e| e.paid_on).max() {
        let window = model.billing_window(contract.signed_on, ordinal - 1);
        if !window.contains(&previous.coerce()) {
            return Err(tracerr::new!(E::Lapsed(contract.id)));
        }
    }

    let amount = ledger::Amount::new(amount)
        .ok_or(E::NonPositiveAmount)
        .map_err(tracerr::wrap!())?;
    if Decimal::from(amount) != contract.price.amount() {
        return Err(tracerr::new!(E::AmountMismatch {
            expected: contract.price,
        }));
    }

    tx.execute(Insert(ledger::Entry {
        id: ledger::Id::default(),
        contract_id: contract.id,
        amount,
        paid_on,
    }))
    .await
    .map_err(tracerr::map_from_and_wrap!(=> E))
}

/// Error of [`PayForContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Contract`] with the provided ID does not exist.
    #[display("`Contract(id: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// Time to pay for the one-time [`Contract`] has passed.
    #[display("time to pay has passed: the contract expired on {expired_on}")]
    Overdue {
        /// [`Date`] the [`Contract`] expired on.
        expired_on: contract::ExpirationDate,
    },

    /// One-time [`Contract`] is already paid off.
    #[display("`Contract(id: {_0})` is already paid off")]
    AlreadyPaidOff(#[error(not(source))] contract::Id),

    /// Payment amount is not positive.
    #[display("payment amount must be positive")]
    NonPositiveAmount,

    /// Payment would overpay the one-time [`Contract`].
    #[display("payment exceeds the price: only {outstanding} is outstanding")]
    Overpayment {
        /// Amount still owed under the [`Contract`].
        outstanding: Decimal,
    },

    /// Subscription payment doesn't match the [`Contract`] price.
    #[display("subscription is paid in full only: {expected} is expected")]
    AmountMismatch {
        /// Exact amount a renewal payment must carry.
        expected: contract::Price,
    },

    /// Payment falls outside the current billing window.
    #[display(
        "renewal is accepted only within {opens_on}..={closes_on}"
    )]
    OutsideBillingWindow {
        /// First [`Date`] the current billing window accepts payments on.
        opens_on: Date,

        /// Last [`Date`] the current billing window accepts payments on.
        closes_on: Date,
    },

    /// Previous billing period was not paid on time.
    #[display(
        "subscription of `Contract(id: {_0})` has lapsed: the previous \
         period was not paid on time"
    )]
    Lapsed(#[error(not(source))] contract::Id),
}
