//! [`Command`] definition.

pub mod create_order;
pub mod rent_motorcycle;
pub mod return_rental;
pub mod update_order_status;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_order::CreateOrder, rent_motorcycle::RentMotorcycle,
    return_rental::ReturnRental, update_order_status::UpdateOrderStatus,
};
