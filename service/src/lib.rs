//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;

use common::money;
use smart_default::SmartDefault;

#[cfg(doc)]
use infra::{Database, Rates};

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Base currency all the prices are kept in.
    ///
    /// Profit reported in this currency is never converted, so the
    /// [`Rates`] source is not consulted for it.
    #[default(money::Code::PLN)]
    pub base_currency: money::Code,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, Rp> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`Rates`] source of this [`Service`].
    rates: Rp,
}

impl<Db, Rp> Service<Db, Rp> {
    /// Creates a new [`Service`] with the provided parameters.
    pub fn new(config: Config, database: Db, rates: Rp) -> Self {
        Self {
            config,
            database,
            rates,
        }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns the [`Rates`] source of this [`Service`].
    #[must_use]
    pub fn rates(&self) -> &Rp {
        &self.rates
    }
}
