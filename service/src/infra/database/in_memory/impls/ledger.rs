//! Ledger-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Select};
use itertools::Itertools as _;
use tracerr::Traced;

use crate::{
    domain::{contract, ledger},
    infra::{
        database::{self, in_memory::Access, InMemory},
        Database,
    },
    read,
};

impl<C: Access> Database<Select<By<Vec<ledger::Entry>, contract::Id>>>
    for InMemory<C>
{
    type Ok = Vec<ledger::Entry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<ledger::Entry>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.0.with(|state| state.entries_of(id)).await)
    }
}

impl<C: Access> Database<Select<By<read::ledger::Total, contract::Id>>>
    for InMemory<C>
{
    type Ok = read::ledger::Total;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::ledger::Total, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .0
            .with(|state| {
                ledger::total(
                    state.ledger.iter().filter(|e| e.contract_id == id),
                )
                .into()
            })
            .await)
    }
}

impl<C: Access>
    Database<
        Select<
            By<HashMap<contract::Id, Vec<ledger::Entry>>, Vec<contract::Id>>,
        >,
    > for InMemory<C>
{
    type Ok = HashMap<contract::Id, Vec<ledger::Entry>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<HashMap<contract::Id, Vec<ledger::Entry>>, Vec<contract::Id>>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        Ok(self
            .0
            .with(|state| {
                state
                    .ledger
                    .iter()
                    .filter(|e| ids.contains(&e.contract_id))
                    .map(|e| (e.contract_id, *e))
                    .into_group_map()
            })
            .await)
    }
}

impl<C: Access> Database<Insert<ledger::Entry>> for InMemory<C> {
    type Ok = ledger::Entry;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut entry): Insert<ledger::Entry>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .0
            .with(move |state| {
                state.last_ids.entry += 1;
                entry.id = state.last_ids.entry.into();
                state.ledger.push(entry);
                entry
            })
            .await)
    }
}
