//! Domain definitions.

pub mod client;
pub mod contract;
pub mod discount;
pub mod ledger;
pub mod pricing;
pub mod software;

pub use self::{
    client::Client, contract::Contract, discount::Discount, software::Software,
};
