//! [`Queue`]-related implementations.

pub mod inmem;

use derive_more::{Display, Error as StdError};
use tokio::sync::mpsc;

pub use self::inmem::InMemory;

/// Message queue operation.
pub use common::Handler as Queue;

/// [`Queue`] error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Consuming side of the queue is gone.
    #[display("queue is disconnected")]
    Disconnected,

    /// Queue is consumed by another subscriber already.
    #[display("queue is subscribed to already")]
    AlreadySubscribed,
}

/// Single delivery of a queued message.
#[derive(Debug)]
pub struct Delivery<T> {
    /// Payload of this [`Delivery`].
    payload: T,
}

impl<T> Delivery<T> {
    /// Returns the payload of this [`Delivery`].
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Acknowledges this [`Delivery`] as processed.
    ///
    /// An unacknowledged in-memory [`Delivery`] is lost once dropped, so
    /// this only marks the intent explicitly.
    pub fn ack(self) {
        drop(self);
    }
}

/// Subscription to messages of type `T`.
#[derive(Debug)]
pub struct Subscription<T>(mpsc::UnboundedReceiver<Delivery<T>>);

impl<T> Subscription<T> {
    /// Receives the next [`Delivery`].
    ///
    /// [`None`] is returned once every publishing side is gone.
    pub async fn next(&mut self) -> Option<Delivery<T>> {
        self.0.recv().await
    }
}
