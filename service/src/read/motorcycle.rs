//! [`Motorcycle`] read model definition.

#[cfg(doc)]
use crate::domain::{motorcycle::Status, Motorcycle};

/// Wrapper around [`Motorcycle`] indicating that it's [`Status::Available`].
#[derive(Clone, Copy, Debug)]
pub struct Available<T>(pub T);
