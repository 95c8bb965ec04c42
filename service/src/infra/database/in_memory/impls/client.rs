//! [`Client`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{client, Client},
    infra::{
        database::{self, in_memory::Access, InMemory},
        Database,
    },
};

impl<C: Access> Database<Select<By<Option<Client>, client::Id>>>
    for InMemory<C>
{
    type Ok = Option<Client>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Client>, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.0.with(|state| state.clients.get(&id).cloned()).await)
    }
}

impl<C: Access> Database<Insert<Client>> for InMemory<C> {
    type Ok = Client;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(mut client): Insert<Client>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .0
            .with(move |state| {
                state.last_ids.client += 1;
                client.id = state.last_ids.client.into();
                drop(state.clients.insert(client.id, client.clone()));
                client
            })
            .await)
    }
}
