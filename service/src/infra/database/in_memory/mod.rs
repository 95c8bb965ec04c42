//! In-memory [`Database`] implementation.

mod impls;

use std::{collections::BTreeMap, sync::Arc};

use derive_more::{Display, Error as StdError};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{
    client, contract, discount, ledger, software, Client, Contract, Discount,
    Software,
};
#[cfg(doc)]
use crate::infra::Database;

/// In-memory [`Database`] keeping its whole state behind a single
/// asynchronous lock.
///
/// Every transaction holds the lock exclusively for its whole lifetime, so
/// concurrent transactions (payments posting against the same [`Contract`]
/// included) are strictly serialized, and plain reads never observe a
/// half-applied one.
#[derive(Clone, Debug)]
pub struct InMemory<C = NonTx>(C);

impl InMemory {
    /// Creates a new empty [`InMemory`] database.
    #[must_use]
    pub fn new() -> Self {
        Self(NonTx {
            state: Arc::new(Mutex::new(State::default())),
        })
    }
}

impl Default for InMemory {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-transactional [`InMemory`] database client.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// Shared [`State`] of the database.
    state: Arc<Mutex<State>>,
}

/// Transactional [`InMemory`] database client.
///
/// Writes apply eagerly under the exclusively held lock, and the lock is
/// released once this client is dropped.
#[derive(Debug)]
pub struct Tx {
    /// Exclusively locked [`State`] of the database.
    state: Mutex<OwnedMutexGuard<State>>,
}

/// Access to the [`State`] of an [`InMemory`] database client.
trait Access {
    /// Runs the provided function over the locked [`State`].
    async fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R;
}

impl Access for NonTx {
    async fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        let mut state = self.state.lock().await;
        f(&mut state)
    }
}

impl Access for Tx {
    async fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        let mut state = self.state.lock().await;
        f(&mut state)
    }
}

/// Everything an [`InMemory`] database stores.
#[derive(Debug, Default)]
struct State {
    /// Stored [`Client`]s.
    clients: BTreeMap<client::Id, Client>,

    /// Stored [`Software`] products.
    softwares: BTreeMap<software::Id, Software>,

    /// Stored [`Discount`]s.
    discounts: BTreeMap<discount::Id, Discount>,

    /// Stored [`Contract`]s.
    contracts: BTreeMap<contract::Id, Contract>,

    /// Append-only payment ledger.
    ledger: Vec<ledger::Entry>,

    /// Last assigned IDs.
    last_ids: LastIds,
}

impl State {
    /// Returns all the ledger [`ledger::Entry`]s of the provided
    /// [`Contract`].
    fn entries_of(&self, id: contract::Id) -> Vec<ledger::Entry> {
        self.ledger
            .iter()
            .filter(|e| e.contract_id == id)
            .copied()
            .collect()
    }
}

/// Last IDs assigned by an [`InMemory`] database.
///
/// New records get sequential IDs on insertion, the way a SQL identity
/// column would assign them.
#[derive(Clone, Copy, Debug, Default)]
struct LastIds {
    /// Last assigned [`client::Id`].
    client: i32,

    /// Last assigned [`software::Id`].
    software: i32,

    /// Last assigned [`discount::Id`].
    discount: i32,

    /// Last assigned [`contract::Id`].
    contract: i32,

    /// Last assigned [`ledger::Id`].
    entry: i32,
}

/// Error of interacting with an [`InMemory`] database.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// [`Contract`] to operate on is missing.
    #[display("`Contract(id: {_0})` is missing")]
    MissingContract(#[error(not(source))] contract::Id),
}
