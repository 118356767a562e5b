//! Background [`Task`]s definitions.

mod background;
pub mod dispatch_order_notifications;

pub use common::Handler as Task;

pub use self::{
    background::Background,
    dispatch_order_notifications::DispatchOrderNotifications,
};
