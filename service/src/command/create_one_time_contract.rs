//! [`Command`] for creating a new one-time [`Contract`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        client,
        contract::{self, one_time},
        discount, pricing, software, Client, Contract, Discount, Software,
    },
    infra::{database, Database},
    read::{
        self,
        contract::{Active, Claim},
    },
    Service,
};

use super::Command;

/// Shortest allowed one-time [`Contract`] period, in days.
const MIN_PERIOD_DAYS: i64 = 3;

/// Longest allowed one-time [`Contract`] period, in days.
const MAX_PERIOD_DAYS: i64 = 30;

/// [`Command`] for creating a new one-time [`Contract`].
#[derive(Clone, Debug)]
pub struct CreateOneTimeContract {
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

    /// [`Date`] the [`Contract`] expires on.
    pub expires_on: contract::ExpirationDate,

    /// [`software::Version`] sold under the [`Contract`].
    pub version: software::Version,

    /// Update-coverage period of the [`Contract`].
    pub update_period: one_time::UpdatePeriod,
}

impl<Db, Rp> Command<CreateOneTimeContract> for Service<Db, Rp>
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
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateOneTimeContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateOneTimeContract {
            client_id,
            software_id,
            name,
            price,
            signed_on,
            expires_on,
            version,
            update_period,
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

        let days = as_of.whole_days_until(expires_on.coerce());
        if !(MIN_PERIOD_DAYS..=MAX_PERIOD_DAYS).contains(&days) {
            return Err(tracerr::new!(E::InvalidPeriod { days }));
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
        let price = pricing::one_time(
            price,
            discount::best_percent(&offers, as_of),
            !owned.is_zero(),
            update_period,
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
                model: one_time::OneTime {
                    version,
                    expires_on,
                    status: one_time::Status::Inactive,
                    update_period,
                }
                .into(),
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(contract)
    }
}

/// Error of [`CreateOneTimeContract`] [`Command`] execution.
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

    /// Contract period is out of the allowed bounds.
    #[display(
        "contract period of {days} days is out of the allowed \
         3..=30 days range"
    )]
    InvalidPeriod {
        /// Number of days between the signing and the expiry.
        days: i64,
    },
}

#[cfg(test)]
mod spec {
    use common::{operations::Insert, Date, Percent};
    use rust_decimal::Decimal;

    use crate::{
        domain::{
            client,
            contract::{self, one_time},
            discount, software, Client, Discount, Software,
        },
        infra::{database::InMemory, rates},
        Config, Service,
    };

    use super::{Command as _, CreateOneTimeContract, ExecutionError};

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
                email: client::Email::new("jan@example.com").unwrap(),
                address: client::Address::new("Warsaw, Polna 1").unwrap(),
                phone: client::PhoneNumber::new("48123456789").unwrap(),
                profile: client::Personal {
                    first_name: client::Name::new("Jan").unwrap(),
                    last_name: client::Name::new("Kowalski").unwrap(),
                    pesel: client::Pesel::new(90_010_112_345).unwrap(),
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
                name: software::Name::new("LedgerPro").unwrap(),
                description: software::Description::new(
                    "Accounting suite for small companies",
                )
                .unwrap(),
                version: software::Version::new("2.1").unwrap(),
                category: software::Category::new("finances").unwrap(),
            }))
            .await
            .unwrap()
            .id
    }

    async fn seed_discount(
        svc: &Service<InMemory, rates::Table>,
        percent: u8,
        starts_on: &str,
        ends_on: &str,
    ) {
        drop(
            svc.database()
                .execute(Insert(Discount {
                    id: discount::Id::default(),
                    name: discount::Name::new("Spring promo").unwrap(),
                    offer: discount::Offer::new("Sign now, pay less").unwrap(),
                    percent: Percent::from_int(percent),
                    starts_on: date(starts_on).coerce(),
                    ends_on: date(ends_on).coerce(),
                }))
                .await
                .unwrap(),
        );
    }

    fn command(
        client_id: client::Id,
        software_id: software::Id,
        signed_on: &str,
        expires_on: &str,
    ) -> CreateOneTimeContract {
        CreateOneTimeContract {
            client_id,
            software_id,
            name: contract::Name::new("LedgerPro licence").unwrap(),
            price: price(1000),
            signed_on: date(signed_on).coerce(),
            expires_on: date(expires_on).coerce(),
            version: software::Version::new("2.1").unwrap(),
            update_period: one_time::UpdatePeriod::MIN,
        }
    }

    #[tokio::test]
    async fn accepts_period_within_bounds() {
        let svc = service();
        let client_id = seed_client(&svc).await;
        let software_id = seed_software(&svc).await;

        let contract = svc
            .execute(command(client_id, software_id, "01-01-2024", "20-01-2024"))
            .await
            .unwrap();

        assert_eq!(contract.price, price(1000));
        assert_eq!(
            contract.as_one_time().unwrap().status,
            one_time::Status::Inactive,
        );
    }

    #[tokio::test]
    async fn rejects_period_out_of_bounds() {
        let svc = service();
        let client_id = seed_client(&svc).await;
        let software_id = seed_software(&svc).await;

        let err = svc
            .execute(command(client_id, software_id, "01-01-2024", "05-02-2024"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::InvalidPeriod { days: 35 },
        ));

        let err = svc
            .execute(command(client_id, software_id, "01-01-2024", "03-01-2024"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::InvalidPeriod { days: 2 },
        ));
    }

    #[tokio::test]
    async fn applies_the_best_active_discount() {
        let svc = service();
        let client_id = seed_client(&svc).await;
        let software_id = seed_software(&svc).await;
        seed_discount(&svc, 10, "01-01-2024", "31-01-2024").await;
        seed_discount(&svc, 5, "01-01-2024", "31-12-2024").await;

        let contract = svc
            .execute(command(client_id, software_id, "15-01-2024", "30-01-2024"))
            .await
            .unwrap();

        assert_eq!(contract.price, price(900));
    }

    #[tokio::test]
    async fn boosts_discount_for_a_returning_client() {
        let svc = service();
        let client_id = seed_client(&svc).await;
        let software_id = seed_software(&svc).await;
        let other_software_id = seed_software(&svc).await;
        seed_discount(&svc, 10, "01-01-2024", "31-12-2024").await;

        drop(
            svc.execute(command(
                client_id,
                other_software_id,
                "01-01-2024",
                "20-01-2024",
            ))
            .await
            .unwrap(),
        );

        let contract = svc
            .execute(command(client_id, software_id, "15-01-2024", "30-01-2024"))
            .await
            .unwrap();

        assert_eq!(contract.price, price(850));
    }

    #[tokio::test]
    async fn rejects_unknown_client_and_software() {
        let svc = service();
        let client_id = seed_client(&svc).await;
        let software_id = seed_software(&svc).await;

        let err = svc
            .execute(command(
                client::Id::from(42),
                software_id,
                "01-01-2024",
                "20-01-2024",
            ))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::ClientNotExists(_),
        ));

        let err = svc
            .execute(command(
                client_id,
                software::Id::from(42),
                "01-01-2024",
                "20-01-2024",
            ))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::SoftwareNotExists(_),
        ));
    }

    #[tokio::test]
    async fn rejects_deleted_client() {
        let svc = service();
        let software_id = seed_software(&svc).await;
        let deleted = svc
            .database()
            .execute(Insert(Client {
                id: client::Id::default(),
                email: client::Email::new("gone@example.com").unwrap(),
                address: client::Address::new("Krakow, Dluga 2").unwrap(),
                phone: client::PhoneNumber::new("48987654321").unwrap(),
                profile: client::Corporate {
                    name: client::Name::new("Goneware").unwrap(),
                    krs: client::Krs::new(123_456_789).unwrap(),
                }
                .into(),
                deleted_on: Some(date("01-12-2023").coerce()),
            }))
            .await
            .unwrap()
            .id;

        let err = svc
            .execute(command(deleted, software_id, "01-01-2024", "20-01-2024"))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::ClientDeleted(_)));
    }

    #[tokio::test]
    async fn rejects_duplicate_active_contract() {
        let svc = service();
        let client_id = seed_client(&svc).await;
        let software_id = seed_software(&svc).await;

        drop(
            svc.execute(command(
                client_id,
                software_id,
                "01-01-2024",
                "20-01-2024",
            ))
            .await
            .unwrap(),
        );

        let err = svc
            .execute(command(client_id, software_id, "10-01-2024", "25-01-2024"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::AlreadyContracted { .. },
        ));

        // The first contract expires on 20-01-2024, so signing anew
        // afterwards is fine.
        drop(
            svc.execute(command(
                client_id,
                software_id,
                "01-02-2024",
                "20-02-2024",
            ))
            .await
            .unwrap(),
        );
    }
}
