//! [`Database`] implementations.

mod client;
mod contract;
mod discount;
mod ledger;
mod software;

use std::sync::Arc;

use common::operations::{Commit, Transact};
use tokio::sync::Mutex;
use tracerr::Traced;

use crate::infra::{database, Database};

use super::{InMemory, NonTx, Tx};

impl Database<Transact> for InMemory<NonTx> {
    type Ok = InMemory<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        let state = Arc::clone(&self.0.state).lock_owned().await;
        Ok(InMemory(Tx {
            state: Mutex::new(state),
        }))
    }
}

impl Database<Commit> for InMemory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        // Writes are applied eagerly under the exclusively held lock, so
        // there is nothing left to flush here.
        Ok(())
    }
}
