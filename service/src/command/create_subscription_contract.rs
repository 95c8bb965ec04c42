//! [`Command`] for creating a new subscription [`Contract`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        client,
        contract::{self, subscription},
        discount, ledger, pricing, software, Client, Contract, Discount,
        Software,
    },
    infra::{database, Database},
    read::{
        self,
        contract::{Active, Claim},
    },
    Service,
};

use super::Command;

/// [`Command`] for creating a new subscription [`Contract`].
///
/// Subscriptions are paid at signing: an accepted [`Command`] also records
/// the first ledger payment for the discounted price, dated at the signing.
#[derive(Clone, Debug)]
pub struct CreateSubscriptionContract {
    /// ID of the [`Client`] signing the [`Contract`].
    pub client_id: client::Id,

    /// ID of the [`Software`] to contract for.
    pub software_id: software::Id,

    /// Name of a new [`Contract`].
    pub name: contract::Name,

    /// Base price of the [`Contract`], before any adjustments.
    pub price: contract::Price,

    /// [`Date`] the [`Contract`] is signed on.
    pub signed_on: contract::SigningDate,

    /// Renewal period of the [`Contract`].
    pub renewal_period: subscription::RenewalPeriod,
}

impl<Db, Rp> Command<CreateSubscriptionContract> for Service<Db, Rp>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Client>, client::Id>>,
            Ok = Option<Client>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Software>, software::Id>>,
            Ok = Option<Software>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Active<Contract>>, Claim>>,
            Ok = Option<Active<Contract>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Discount>, Date>>,
            Ok = Vec<Discount>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::contract::TotalCount, client::Id>>,
            Ok = read::contract::TotalCount,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Insert<Contract>,
            Ok = Contract,
            Err = Traced<database::Error>,
        > + Database<
            Insert<ledger::Entry>,
            Ok = ledger::Entry,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateSubscriptionContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateSubscriptionContract {
            client_id,
            software_id,
            name,
            price,
            signed_on,
            renewal_period,
        } = cmd;

        let client = self
            .database()
            .execute(Select(By::<Option<Client>, _>::new(client_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ClientNotExists(client_id))
            .map_err(tracerr::wrap!())?;
        if client.is_deleted() {
            return Err(tracerr::new!(E::ClientDeleted(client_id)));
        }

        self.database()
            .execute(Select(By::<Option<Software>, _>::new(software_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SoftwareNotExists(software_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let as_of = signed_on.coerce();
        if let Some(Active(existing)) = self
            .database()
            .execute(Select(By::<Option<Active<Contract>>, _>::new(Claim {
                client_id,
                software_id,
                as_of,
            })))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            return Err(tracerr::new!(E::AlreadyContracted {
                client_id,
                contract_id: existing.id,
            }));
        }

        let offers = self
            .database()
            .execute(Select(By::<Vec<Discount>, _>::new(as_of)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let owned = self
            .database()
            .execute(Select(
                By::<read::contract::TotalCount, _>::new(client_id),
            ))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let price = pricing::subscription(
            price,
            discount::best_percent(&offers, as_of),
            !owned.is_zero(),
        );

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let contract = tx
            .execute(Insert(Contract {
                id: contract::Id::default(),
                client_id,
                software_id,
                name,
                price,
                signed_on,
                model: subscription::Subscription { renewal_period }.into(),
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // A fully discounted subscription owes nothing at signing.
        if let Some(amount) = ledger::Amount::new(contract.price.amount()) {
            tx.execute(Insert(ledger::Entry {
                id: ledger::Id::default(),
                contract_id: contract.id,
                amount,
                paid_on: signed_on.coerce(),
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(contract)
    }
}

/// Error of [`CreateSubscriptionContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Client`] with the provided ID does not exist.
    #[display("`Client(id: {_0})` does not exist")]
    ClientNotExists(#[error(not(source))] client::Id),

    /// [`Client`] with the provided ID is soft-deleted.
    #[display("`Client(id: {_0})` is deleted")]
    ClientDeleted(#[error(not(source))] client::Id),

    /// [`Software`] with the provided ID does not exist.
    #[display("`Software(id: {_0})` does not exist")]
    SoftwareNotExists(#[error(not(source))] software::Id),

    /// [`Client`] already holds an active [`Contract`] for the [`Software`].
    #[display(
        "`Client(id: {client_id})` already holds the active \
         `Contract(id: {contract_id})` for this `Software`"
    )]
    AlreadyContracted {
        /// ID of the [`Client`].
        client_id: client::Id,

        /// ID of the claiming [`Contract`].
        contract_id: contract::Id,
    },
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Insert, Select},
        Date, Percent,
    };
    use rust_decimal::Decimal;

    use crate::{
        domain::{
            client,
            contract::{self, subscription},
            discount, ledger, software, Client, Discount, Software,
        },
        infra::{database::InMemory, rates, Database as _},
        Config, Service,
    };

    use super::{Command as _, CreateSubscriptionContract, ExecutionError};

    fn service() -> Service<InMemory, rates::Table> {
        Service::new(Config::default(), InMemory::new(), rates::Table::default())
    }

    fn date(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    fn price(amount: i64) -> contract::Price {
        contract::Price::new(Decimal::from(amount)).unwrap()
    }

    async fn seed_client(svc: &Service<InMemory, rates::Table>) -> client::Id {
        svc.database()
            .execute(Insert(Client {
                id: client::Id::default(),
                email: client::Email::new("anna@example.com").unwrap(),
                address: client::Address::new("Gdansk, Morska 3").unwrap(),
                phone: client::PhoneNumber::new("48555666777").unwrap(),
                profile: client::Personal {
                    first_name: client::Name::new("Anna").unwrap(),
                    last_name: client::Name::new("Nowak").unwrap(),
                    pesel: client::Pesel::new(85_050_554_321).unwrap(),
                }
                .into(),
                deleted_on: None,
            }))
            .await
            .unwrap()
            .id
    }

    async fn seed_software(
        svc: &Service<InMemory, rates::Table>,
    ) -> software::Id {
        svc.database()
            .execute(Insert(Software {
                id: software::Id::default(),
                name: software::Name::new("CloudSync").unwrap(),
                description: software::Description::new(
                    "File synchronization service",
                )
                .unwrap(),
                version: software::Version::new("5.0").unwrap(),
                category: software::Category::new("storage").unwrap(),
            }))
            .await
            .unwrap()
            .id
    }

    fn command(
        client_id: client::Id,
        software_id: software::Id,
        signed_on: &str,
        renewal_months: u8,
    ) -> CreateSubscriptionContract {
        CreateSubscriptionContract {
            client_id,
            software_id,
            name: contract::Name::new("CloudSync subscription").unwrap(),
            price: price(1000),
            signed_on: date(signed_on).coerce(),
            renewal_period: subscription::RenewalPeriod::new(renewal_months)
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn records_the_signing_payment() {
        let svc = service();
        let client_id = seed_client(&svc).await;
        let software_id = seed_software(&svc).await;

        let contract = svc
            .execute(command(client_id, software_id, "01-01-2024", 6))
            .await
            .unwrap();

        let entries = svc
            .database()
            .execute(Select(By::<Vec<ledger::Entry>, _>::new(contract.id)))
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(Decimal::from(entries[0].amount), Decimal::from(1000));
        assert_eq!(entries[0].paid_on.coerce(), date("01-01-2024"));
    }

    #[tokio::test]
    async fn discounts_the_signing_payment() {
        let svc = service();
        let client_id = seed_client(&svc).await;
        let software_id = seed_software(&svc).await;
        drop(
            svc.database()
                .execute(Insert(Discount {
                    id: discount::Id::default(),
                    name: discount::Name::new("Winter promo").unwrap(),
                    offer: discount::Offer::new("Cold season, hot prices")
                        .unwrap(),
                    percent: Percent::from_int(20),
                    starts_on: date("01-01-2024").coerce(),
                    ends_on: date("31-01-2024").coerce(),
                }))
                .await
                .unwrap(),
        );

        let contract = svc
            .execute(command(client_id, software_id, "15-01-2024", 6))
            .await
            .unwrap();

        assert_eq!(contract.price, price(800));
        let entries = svc
            .database()
            .execute(Select(By::<Vec<ledger::Entry>, _>::new(contract.id)))
            .await
            .unwrap();
        assert_eq!(Decimal::from(entries[0].amount), Decimal::from(800));
    }

    #[tokio::test]
    async fn rejects_duplicate_active_subscription() {
        let svc = service();
        let client_id = seed_client(&svc).await;
        let software_id = seed_software(&svc).await;

        drop(
            svc.execute(command(client_id, software_id, "01-01-2024", 6))
            .await
            .unwrap(),
        );

        // The signing payment keeps the claim for the whole renewal period.
        let err = svc
            .execute(command(client_id, software_id, "01-03-2024", 6))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::AlreadyContracted { .. },
        ));
    }

    #[tokio::test]
    async fn rejects_unknown_client() {
        let svc = service();
        let software_id = seed_software(&svc).await;

        let err = svc
            .execute(command(client::Id::from(7), software_id, "01-01-2024", 6))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::ClientNotExists(_),
        ));
    }
}
