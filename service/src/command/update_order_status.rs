//! [`Command`] for moving an [`Order`] through its delivery lifecycle.

use common::operations::{By, Select, Update, UpdateIf};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{order, partner, DeliveryPartner, Order},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for moving an [`Order`] through its delivery lifecycle.
#[derive(Clone, Debug)]
pub struct UpdateOrderStatus {
    /// [`order::PublicId`] of the [`Order`] to update.
    pub order: order::PublicId,

    /// [`partner::Id`] of the [`DeliveryPartner`] driving the update.
    pub partner: partner::Id,

    /// [`order::Status`] to move the [`Order`] into.
    pub status: order::Status,
}

impl<Db, Mq> Command<UpdateOrderStatus> for Service<Db, Mq>
where
    Db: Database<
            Select<By<Option<Order>, order::PublicId>>,
            Ok = Option<Order>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<DeliveryPartner>, partner::Id>>,
            Ok = Option<DeliveryPartner>,
            Err = Traced<database::Error>,
        > + Database<
            UpdateIf<Order, order::Status>,
            Ok = bool,
            Err = Traced<database::Error>,
        > + Database<
            Update<DeliveryPartner>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
{
    type Ok = Order;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateOrderStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateOrderStatus {
            order: public_id,
            partner: partner_id,
            status,
        } = cmd;

        let order = self
            .database()
            .execute(Select(By::new(public_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::OrderNotFound(public_id)))?;

        let partner = self
            .database()
            .execute(Select(By::new(partner_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::PartnerNotFound(partner_id)))?;

        let previous = order.status;
        let (order, partner) = transition(order, partner, status)
            .map_err(|e| tracerr::new!(E::Transition(e)))?;

        let committed = self
            .database()
            .execute(UpdateIf(order.clone(), previous))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !committed {
            return Err(tracerr::new!(E::Conflict(order.public_id)));
        }

        // The order write above is committed on its own, so a failure here
        // leaves the two aggregates out of sync and is only surfaced.
        self.database()
            .execute(Update(partner))
            .await
            .map_err(|e| {
                log::error!(
                    "`Order` `{}` is updated, but its `DeliveryPartner` \
                     could not be persisted: {e}",
                    order.public_id,
                );
                e
            })
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(order)
    }
}

/// Applies the requested [`order::Status`] to the pair of aggregates,
/// checking every lifecycle rule.
fn transition(
    mut order: Order,
    mut partner: DeliveryPartner,
    incoming: order::Status,
) -> Result<(Order, DeliveryPartner), TransitionError> {
    use order::Status;
    use TransitionError as E;

    if !order.can_update_status(incoming) {
        return Err(E::Forbidden {
            from: order.status,
            to: incoming,
        });
    }

    if order.is_withdrawal(incoming) {
        order.status = Status::Available;
        order.assigned_partner = None;
        partner.is_available = true;
        partner.remove_notification(&order.public_id);
        return Ok((order, partner));
    }

    match incoming {
        Status::Accepted => {
            if !order.can_be_accepted_by(&partner) {
                return Err(E::CannotAccept(partner.id));
            }
            order.status = Status::Accepted;
            order.assigned_partner = Some(partner.id);
            partner.is_available = false;
        }
        Status::Delivered => {
            if !order.can_be_delivered_by(&partner) {
                return Err(E::CannotDeliver(partner.id));
            }
            order.status = Status::Delivered;
            partner.is_available = true;
            partner.remove_notification(&order.public_id);
        }
        Status::Available => {
            return Err(E::Forbidden {
                from: order.status,
                to: incoming,
            });
        }
    }

    Ok((order, partner))
}

/// Error of a single [`Order`] lifecycle transition.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum TransitionError {
    /// Moving between the two [`order::Status`]es is not allowed.
    #[display("cannot move order from `{from}` to `{to}` status")]
    Forbidden {
        /// Current [`order::Status`].
        from: order::Status,

        /// Requested [`order::Status`].
        to: order::Status,
    },

    /// Partner fails the preconditions of accepting the [`Order`].
    #[display("partner `{_0}` cannot accept the order")]
    CannotAccept(#[error(not(source))] partner::Id),

    /// Partner fails the preconditions of delivering the [`Order`].
    #[display("partner `{_0}` cannot deliver the order")]
    CannotDeliver(#[error(not(source))] partner::Id),
}

/// Error of [`UpdateOrderStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Order`] does not exist.
    #[display("order `{_0}` does not exist")]
    OrderNotFound(#[error(not(source))] order::PublicId),

    /// [`DeliveryPartner`] does not exist.
    #[display("partner `{_0}` does not exist")]
    PartnerNotFound(#[error(not(source))] partner::Id),

    /// Requested transition breaks a lifecycle rule.
    #[display("{_0}")]
    #[from]
    Transition(TransitionError),

    /// [`Order`] was updated concurrently.
    #[display("order `{_0}` was updated concurrently")]
    Conflict(#[error(not(source))] order::PublicId),
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Insert, Select},
        Handler as _, Money,
    };

    use crate::{
        domain::{
            order::{self, Order},
            partner::DeliveryPartner,
        },
        infra::{database, queue},
        pricing, Config, Service,
    };

    use super::{transition, TransitionError, UpdateOrderStatus};

    fn order() -> Order {
        Order::new(Money::new(10.into()), order::Status::Available)
    }

    fn notified_partner(order: &Order) -> DeliveryPartner {
        let mut partner = DeliveryPartner::new();
        partner.has_active_rental = true;
        partner.is_available = true;
        partner.notify(order.notification());
        partner
    }

    fn accepted_pair(order: Order) -> (Order, DeliveryPartner) {
        let partner = notified_partner(&order);
        transition(order, partner, order::Status::Accepted).unwrap()
    }

    #[test]
    fn accept_assigns_order_and_occupies_partner() {
        let order = order();
        let partner = notified_partner(&order);
        let partner_id = partner.id;

        let (order, partner) =
            transition(order, partner, order::Status::Accepted).unwrap();

        assert_eq!(order.status, order::Status::Accepted);
        assert_eq!(order.assigned_partner, Some(partner_id));
        assert!(!partner.is_available);
    }

    #[test]
    fn withdraw_resets_order_and_frees_partner() {
        let (order, partner) = accepted_pair(order());

        let (order, partner) =
            transition(order, partner, order::Status::Available).unwrap();

        assert_eq!(order.status, order::Status::Available);
        assert_eq!(order.assigned_partner, None);
        assert!(partner.is_available);
        assert!(!partner.is_notified_about(&order.public_id));
    }

    #[test]
    fn deliver_finishes_order_and_frees_partner() {
        let (order, partner) = accepted_pair(order());

        let (order, partner) =
            transition(order, partner, order::Status::Delivered).unwrap();

        assert_eq!(order.status, order::Status::Delivered);
        assert!(partner.is_available);
        assert!(!partner.is_notified_about(&order.public_id));
    }

    #[test]
    fn repeated_status_is_forbidden() {
        let order = order();
        let partner = notified_partner(&order);

        let err = transition(order, partner, order::Status::Available)
            .unwrap_err();

        assert!(matches!(err, TransitionError::Forbidden { .. }));
    }

    #[test]
    fn delivered_order_rejects_any_transition() {
        let (order, partner) = accepted_pair(order());
        let (order, partner) =
            transition(order, partner, order::Status::Delivered).unwrap();

        for status in [order::Status::Available, order::Status::Accepted] {
            let err = transition(order.clone(), partner.clone(), status)
                .unwrap_err();
            assert!(matches!(err, TransitionError::Forbidden { .. }));
        }
    }

    #[test]
    fn unnotified_partner_cannot_accept() {
        let order = order();
        let mut partner = notified_partner(&order);
        partner.remove_notification(&order.public_id);

        let err = transition(order, partner, order::Status::Accepted)
            .unwrap_err();

        assert!(matches!(err, TransitionError::CannotAccept(..)));
    }

    #[test]
    fn free_partner_cannot_deliver() {
        let (order, mut partner) = accepted_pair(order());
        partner.is_available = true;

        let err = transition(order, partner, order::Status::Delivered)
            .unwrap_err();

        assert!(matches!(err, TransitionError::CannotDeliver(..)));
    }

    fn service(
    ) -> Service<database::InMemory, queue::InMemory<order::Notification>> {
        let config = Config {
            pricing: pricing::test_options(),
            calculators: pricing::Calculators::default(),
        };
        let (service, _bg) = Service::new(
            config,
            database::InMemory::default(),
            queue::InMemory::default(),
        );
        service
    }

    #[tokio::test]
    async fn accept_persists_both_aggregates() {
        let service = service();
        let order = order();
        let partner = notified_partner(&order);
        service.database().execute(Insert(order.clone())).await.unwrap();
        service
            .database()
            .execute(Insert(partner.clone()))
            .await
            .unwrap();

        let updated = service
            .execute(UpdateOrderStatus {
                order: order.public_id.clone(),
                partner: partner.id,
                status: order::Status::Accepted,
            })
            .await
            .unwrap();

        assert_eq!(updated.status, order::Status::Accepted);
        assert_eq!(updated.assigned_partner, Some(partner.id));

        let stored = service
            .database()
            .execute(Select(By::<Option<DeliveryPartner>, _>::new(partner.id)))
            .await
            .unwrap();
        assert!(!stored.unwrap().is_available);
    }

    #[tokio::test]
    async fn full_lifecycle_accept_then_deliver() {
        let service = service();
        let order = order();
        let partner = notified_partner(&order);
        service.database().execute(Insert(order.clone())).await.unwrap();
        service
            .database()
            .execute(Insert(partner.clone()))
            .await
            .unwrap();

        for status in [order::Status::Accepted, order::Status::Delivered] {
            drop(
                service
                    .execute(UpdateOrderStatus {
                        order: order.public_id.clone(),
                        partner: partner.id,
                        status,
                    })
                    .await
                    .unwrap(),
            );
        }

        let stored = service
            .database()
            .execute(Select(By::<Option<DeliveryPartner>, _>::new(partner.id)))
            .await
            .unwrap();
        let stored = stored.unwrap();
        assert!(stored.is_available);
        assert!(!stored.is_notified_about(&order.public_id));
    }

    #[tokio::test]
    async fn missing_order_is_reported() {
        let service = service();
        let partner = DeliveryPartner::new();
        service
            .database()
            .execute(Insert(partner.clone()))
            .await
            .unwrap();

        let err = service
            .execute(UpdateOrderStatus {
                order: order().public_id,
                partner: partner.id,
                status: order::Status::Accepted,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            super::ExecutionError::OrderNotFound(..)
        ));
    }
}
