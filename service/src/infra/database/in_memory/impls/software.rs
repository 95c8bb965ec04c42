//! [`Software`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{software, Software},
    infra::{
        database::{self, in_memory::Access, InMemory},
        Database,
    },
};

impl<C: Access> Database<Select<By<Option<Software>, software::Id>>>
    for InMemory<C>
{
    type Ok = Option<Software>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Software>, software::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.0.with(|state| state.softwares.get(&id).cloned()).await)
    }
}

impl<C: Access> Database<Insert<Software>> for InMemory<C> {
    type Ok = Software;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut software): Insert<Software>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .0
            .with(move |state| {
                state.last_ids.software += 1;
                software.id = state.last_ids.software.into();
                drop(state.softwares.insert(software.id, software.clone()));
                software
            })
            .await)
    }
}
