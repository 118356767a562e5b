//! Domain definitions.

pub mod motorcycle;
pub mod order;
pub mod partner;
pub mod rental;

pub use self::{
    motorcycle::Motorcycle, order::Order, partner::DeliveryPartner,
    rental::Rental,
};
