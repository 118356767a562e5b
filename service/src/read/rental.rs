//! [`Rental`] read model definition.

#[cfg(doc)]
use crate::domain::{rental::Status, Rental};

/// Wrapper around [`Rental`] indicating that it's [`Status::Ongoing`].
#[derive(Clone, Copy, Debug)]
pub struct Ongoing<T>(pub T);
