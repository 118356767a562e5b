//! Service contains the business logic of the application.
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod pricing;
pub mod query;
pub mod read;
pub mod task;

use common::operations::{By, Start};
use derive_more::Error;

#[cfg(doc)]
use infra::{Database, Queue};

pub use self::{command::Command, query::Query, task::Task};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Rental pricing options.
    pub pricing: pricing::Options,

    /// Registry of rental cost calculators.
    pub calculators: pricing::Calculators,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, Mq> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`Queue`] of this [`Service`].
    queue: Mq,
}

impl<Db, Mq> Service<Db, Mq> {
    /// Creates a new [`Service`] with the provided parameters.
    pub fn new(config: Config, database: Db, queue: Mq) -> (Self, task::Background)
    where
        Self: Task<
                Start<By<task::DispatchOrderNotifications<Self>, ()>>,
                Ok = (),
                Err: Error + 'static,
            > + Clone
            + 'static,
    {
        let this = Service {
            config,
            database,
            queue,
        };

        let mut bg = task::Background::default();
        let svc = this.clone();
        bg.spawn(async move { svc.execute(Start(By::new(()))).await });

        (this, bg)
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns [`Queue`] of this [`Service`].
    #[must_use]
    pub fn queue(&self) -> &Mq {
        &self.queue
    }
}
