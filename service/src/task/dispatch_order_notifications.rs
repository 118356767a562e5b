//! [`DispatchOrderNotifications`] [`Task`].

use std::error::Error;

use common::operations::{By, Perform, Select, Start, Subscribe, Update};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{order, DeliveryPartner, Order},
    infra::{database, queue, Database, Queue},
    read, Service,
};

use super::Task;

/// [`Task`] fanning published [`order::Notification`]s out to the eligible
/// [`DeliveryPartner`]s.
#[derive(Clone, Debug)]
pub struct DispatchOrderNotifications<S> {
    /// [`Service`] instance.
    service: S,
}

impl<Db, Mq> Task<Start<By<DispatchOrderNotifications<Self>, ()>>>
    for Service<Db, Mq>
where
    Mq: Queue<
        Subscribe<order::Notification>,
        Ok = queue::Subscription<order::Notification>,
        Err = Traced<queue::Error>,
    >,
    DispatchOrderNotifications<Self>:
        Task<Perform<order::Notification>, Ok = (), Err: Error>,
    Self: Clone,
{
    type Ok = ();
    type Err = Traced<queue::Error>;

    async fn execute(
        &self,
        Start(_): Start<By<DispatchOrderNotifications<Self>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let task = DispatchOrderNotifications {
            service: self.clone(),
        };

        let mut subscription = self
            .queue()
            .execute(Subscribe::default())
            .await
            .map_err(tracerr::wrap!())?;

        // Consumption is at-least-once: a delivery is acknowledged only
        // after it's fully processed, and a failed one is left for a later
        // redelivery.
        while let Some(delivery) = subscription.next().await {
            match task.execute(Perform(delivery.payload().clone())).await {
                Ok(()) => delivery.ack(),
                Err(e) => log::error!(
                    "`task::DispatchOrderNotifications` failed: {e}",
                ),
            }
        }

        Ok(())
    }
}

impl<Db, Mq> Task<Perform<order::Notification>>
    for DispatchOrderNotifications<Service<Db, Mq>>
where
    Db: Database<
            Select<By<Option<Order>, order::PublicId>>,
            Ok = Option<Order>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<read::partner::Eligible<DeliveryPartner>>, ()>>,
            Ok = Vec<read::partner::Eligible<DeliveryPartner>>,
            Err = Traced<database::Error>,
        > + Database<
            Update<DeliveryPartner>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<Update<Order>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = ExecutionError;

    async fn execute(
        &self,
        Perform(notification): Perform<order::Notification>,
    ) -> Result<Self::Ok, Self::Err> {
        let db = self.service.database();

        let Some(mut order) = db
            .execute(Select(By::new(notification.public_id.clone())))
            .await
            .map_err(tracerr::wrap!())?
        else {
            log::warn!(
                "order `{}` vanished before dispatching",
                notification.public_id,
            );
            return Ok(());
        };
        if !order.can_partners_be_notified() {
            // Either a redelivery of an already dispatched event, or the
            // order was taken meanwhile.
            return Ok(());
        }

        let eligible = db
            .execute(Select(By::new(())))
            .await
            .map_err(tracerr::wrap!())?;

        for read::partner::Eligible(mut partner) in eligible {
            let partner_id = partner.id;
            partner.notify(notification.clone());
            if let Err(e) = db.execute(Update(partner)).await {
                log::error!(
                    "failed to notify partner `{partner_id}` about order \
                     `{}`: {e}",
                    notification.public_id,
                );
                continue;
            }
            _ = order.notified_partners.insert(partner_id);
        }

        // Persisting the notified set last makes a crashed fan-out retry
        // from scratch instead of losing partners.
        db.execute(Update(order)).await.map_err(tracerr::wrap!())
    }
}

/// Error of [`DispatchOrderNotifications`] execution.
pub type ExecutionError = Traced<database::Error>;
