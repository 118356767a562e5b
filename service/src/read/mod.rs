//! Read entities definitions.

pub mod motorcycle;
pub mod partner;
pub mod rental;
