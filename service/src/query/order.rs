//! [`Order`]-related [`Query`] definitions.

use std::collections::HashSet;

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{order, partner, DeliveryPartner, Order},
    infra::{database, Database},
    Service,
};

use super::Query;

/// [`Query`] checking whether an [`Order`] still awaits a delivery partner.
#[derive(Clone, Debug)]
pub struct Availability(pub order::PublicId);

impl<Db, Mq> Query<Availability> for Service<Db, Mq>
where
    Db: Database<
        Select<By<Option<Order>, order::PublicId>>,
        Ok = Option<Order>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = bool;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        Availability(public_id): Availability,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let order = self
            .database()
            .execute(Select(By::new(public_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::OrderNotFound(public_id)))?;

        Ok(order.is_available_to_delivery())
    }
}

/// [`Query`] listing the [`DeliveryPartner`]s notified about an [`Order`].
#[derive(Clone, Debug)]
pub struct NotifiedPartners(pub order::PublicId);

impl<Db, Mq> Query<NotifiedPartners> for Service<Db, Mq>
where
    Db: Database<
            Select<By<Option<Order>, order::PublicId>>,
            Ok = Option<Order>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<DeliveryPartner>, HashSet<partner::Id>>>,
            Ok = Vec<DeliveryPartner>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Vec<DeliveryPartner>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        NotifiedPartners(public_id): NotifiedPartners,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let order = self
            .database()
            .execute(Select(By::new(public_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::OrderNotFound(public_id)))?;

        self.database()
            .execute(Select(By::new(order.notified_partners)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of an [`Order`]-related [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Order`] does not exist.
    #[display("order `{_0}` does not exist")]
    OrderNotFound(#[error(not(source))] order::PublicId),
}

#[cfg(test)]
mod spec {
    use common::{operations::Insert, Handler as _, Money};

    use crate::{
        domain::{
            order::{self, Order},
            partner::DeliveryPartner,
        },
        infra::{database, queue},
        pricing, Config, Service,
    };

    use super::{Availability, ExecutionError, NotifiedPartners};

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
    async fn reports_availability_by_status() {
        let service = service();
        let available = Order::new(Money::ZERO, order::Status::Available);
        let accepted = Order::new(Money::ZERO, order::Status::Accepted);
        service
            .database()
            .execute(Insert(available.clone()))
            .await
            .unwrap();
        service
            .database()
            .execute(Insert(accepted.clone()))
            .await
            .unwrap();

        assert!(service
            .execute(Availability(available.public_id))
            .await
            .unwrap());
        assert!(!service
            .execute(Availability(accepted.public_id))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn missing_order_is_reported() {
        let service = service();
        let unknown = Order::new(Money::ZERO, order::Status::Available);

        let err = service
            .execute(Availability(unknown.public_id))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::OrderNotFound(..)));
    }

    #[tokio::test]
    async fn lists_only_notified_partners() {
        let service = service();
        let notified = DeliveryPartner::new();
        let other = DeliveryPartner::new();
        service
            .database()
            .execute(Insert(notified.clone()))
            .await
            .unwrap();
        service
            .database()
            .execute(Insert(other.clone()))
            .await
            .unwrap();

        let mut order = Order::new(Money::ZERO, order::Status::Available);
        assert!(order.notified_partners.insert(notified.id));
        service
            .database()
            .execute(Insert(order.clone()))
            .await
            .unwrap();

        let partners = service
            .execute(NotifiedPartners(order.public_id))
            .await
            .unwrap();

        assert_eq!(partners.len(), 1);
        assert_eq!(partners[0].id, notified.id);
    }
}
