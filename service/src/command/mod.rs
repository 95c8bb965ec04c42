//! [`Command`] definition.

pub mod create_one_time_contract;
pub mod create_subscription_contract;
pub mod pay_for_contract;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_one_time_contract::CreateOneTimeContract,
    create_subscription_contract::CreateSubscriptionContract,
    pay_for_contract::PayForContract,
};
