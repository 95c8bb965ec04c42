//! Exchange-rates source implementations.

pub mod table;

use common::money;
use derive_more::{Display, Error as StdError};

pub use self::table::Table;

/// Exchange-rates source operation.
pub use common::Handler as Rates;

/// [`Rates`] source error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Requested currency is not quoted by the source.
    #[display("currency `{_0}` is not quoted by the rates source")]
    UnknownCurrency(#[error(not(source))] money::Code),

    /// The source cannot be reached.
    #[display("rates source is unavailable")]
    Unavailable,
}
