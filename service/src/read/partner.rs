//! [`DeliveryPartner`] read model definition.

#[cfg(doc)]
use crate::domain::DeliveryPartner;

/// Wrapper around [`DeliveryPartner`] indicating that it rents a motorcycle
/// and is free to take an order, so can be notified about new ones.
#[derive(Clone, Copy, Debug)]
pub struct Eligible<T>(pub T);
