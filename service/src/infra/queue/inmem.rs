//! In-memory [`Queue`] implementation.

use std::sync::Arc;

use common::operations::{Publish, Subscribe};
use tokio::sync::{mpsc, Mutex};
use tracerr::Traced;

use crate::infra::{queue, Queue};

use super::{Delivery, Error, Subscription};

/// In-memory [`Queue`] delivering messages over an unbounded channel to a
/// single subscriber.
#[derive(Debug)]
pub struct InMemory<T> {
    /// Publishing side of the channel.
    tx: mpsc::UnboundedSender<Delivery<T>>,

    /// Consuming side of the channel, till taken by a subscriber.
    rx: Arc<Mutex<Option<mpsc::UnboundedReceiver<Delivery<T>>>>>,
}

impl<T> Clone for InMemory<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: Arc::clone(&self.rx),
        }
    }
}

impl<T> Default for InMemory<T> {
    fn default() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Arc::new(Mutex::new(Some(rx))),
        }
    }
}

impl<T> Queue<Publish<T>> for InMemory<T> {
    type Ok = ();
    type Err = Traced<queue::Error>;

    async fn execute(
        &self,
        Publish(payload): Publish<T>,
    ) -> Result<Self::Ok, Self::Err> {
        self.tx
            .send(Delivery { payload })
            .map_err(|_| tracerr::new!(Error::Disconnected))
    }
}

impl<T> Queue<Subscribe<T>> for InMemory<T> {
    type Ok = Subscription<T>;
    type Err = Traced<queue::Error>;

    async fn execute(
        &self,
        _: Subscribe<T>,
    ) -> Result<Self::Ok, Self::Err> {
        self.rx
            .lock()
            .await
            .take()
            .map(Subscription)
            .ok_or_else(|| tracerr::new!(Error::AlreadySubscribed))
    }
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{Publish, Subscribe},
        Handler as _,
    };

    use super::InMemory;

    #[tokio::test]
    async fn delivers_published_messages_in_order() {
        let queue = InMemory::<u32>::default();
        let mut sub = queue.execute(Subscribe::default()).await.unwrap();

        queue.execute(Publish(1)).await.unwrap();
        queue.execute(Publish(2)).await.unwrap();

        assert_eq!(sub.next().await.unwrap().payload(), &1);
        assert_eq!(sub.next().await.unwrap().payload(), &2);
    }

    #[tokio::test]
    async fn second_subscriber_is_rejected() {
        let queue = InMemory::<u32>::default();
        let _sub = queue.execute(Subscribe::default()).await.unwrap();

        assert!(queue.execute(Subscribe::default()).await.is_err());
    }
}
