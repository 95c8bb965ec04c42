//! [`Contract`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{client, contract, software, Contract},
    infra::{
        database::{
            self,
            in_memory::{Access, Error},
            InMemory,
        },
        Database,
    },
    read::{
        self,
        contract::{Active, Claim},
    },
};

impl<C: Access> Database<Select<By<Option<Contract>, contract::Id>>>
    for InMemory<C>
{
    type Ok = Option<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.0.with(|state| state.contracts.get(&id).cloned()).await)
    }
}

impl<C: Access> Database<Select<By<Vec<Contract>, Option<software::Id>>>>
    for InMemory<C>
{
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Contract>, Option<software::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let software_id = by.into_inner();
        Ok(self
            .0
            .with(|state| {
                state
                    .contracts
                    .values()
                    .filter(|c| {
                        software_id.map_or(true, |id| c.software_id == id)
                    })
                    .cloned()
                    .collect()
            })
            .await)
    }
}

impl<C: Access> Database<Select<By<read::contract::TotalCount, client::Id>>>
    for InMemory<C>
{
    type Ok = read::contract::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::contract::TotalCount, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let client_id = by.into_inner();
        Ok(self
            .0
            .with(|state| {
                let count = state
                    .contracts
                    .values()
                    .filter(|c| c.client_id == client_id)
                    .count();
                i32::try_from(count).unwrap_or(i32::MAX).into()
            })
            .await)
    }
}

impl<C: Access> Database<Select<By<Option<Active<Contract>>, Claim>>>
    for InMemory<C>
{
    type Ok = Option<Active<Contract>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Active<Contract>>, Claim>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Claim {
            client_id,
            software_id,
            as_of,
        } = by.into_inner();
        Ok(self
            .0
            .with(|state| {
                state
                    .contracts
                    .values()
                    .find(|c| {
                        c.client_id == client_id
                            && c.software_id == software_id
                            && c.has_active_claim(
                                &state.entries_of(c.id),
                                as_of,
                            )
                    })
                    .cloned()
                    .map(Active)
            })
            .await)
    }
}

impl<C: Access> Database<Insert<Contract>> for InMemory<C> {
    type Ok = Contract;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut contract): Insert<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .0
            .with(move |state| {
                state.last_ids.contract += 1;
                contract.id = state.last_ids.contract.into();
                drop(state.contracts.insert(contract.id, contract.clone()));
                contract
            })
            .await)
    }
}

impl<C: Access> Database<Update<Contract>> for InMemory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(contract): Update<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0
            .with(move |state| {
                let id = contract.id;
                state
                    .contracts
                    .get_mut(&id)
                    .map(|stored| *stored = contract)
                    .ok_or_else(|| tracerr::new!(Error::MissingContract(id)))
            })
            .await
            .map_err(tracerr::map_from)
    }
}

impl<C: Access> Database<Lock<By<Contract, contract::Id>>> for InMemory<C> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Contract, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // The whole state is locked for the transaction lifetime already,
        // so only the row existence is asserted here.
        let id = by.into_inner();
        self.0
            .with(|state| {
                state
                    .contracts
                    .contains_key(&id)
                    .then_some(())
                    .ok_or_else(|| tracerr::new!(Error::MissingContract(id)))
            })
            .await
            .map_err(tracerr::map_from)
    }
}
