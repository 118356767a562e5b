//! Abstractions over external infrastructure.

pub mod database;
pub mod queue;

pub use self::{database::Database, queue::Queue};
