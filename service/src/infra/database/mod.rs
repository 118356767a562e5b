//! [`Database`]-related implementations.

pub mod inmem;

use derive_more::{Display, Error as StdError, From};

pub use self::inmem::InMemory;

/// Database operation.
pub use common::Handler as Database;

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`InMemory`] error.
    InMemory(inmem::Error),
}

impl Error {
    /// Checks if the error is a violation of a uniqueness guarantee.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::InMemory(e) => {
                matches!(e, inmem::Error::UniqueViolation { .. })
            }
        }
    }
}
