//! [`Query`] definition.

pub mod order;
pub mod rental_price;

/// [`Query`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Query;

pub use self::rental_price::RentalPrice;
