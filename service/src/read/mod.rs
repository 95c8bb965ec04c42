//! Read models of the domain.

pub mod contract;
pub mod ledger;
