//! Infrastructure implementations.

pub mod database;
pub mod rates;

pub use self::{database::Database, rates::Rates};
