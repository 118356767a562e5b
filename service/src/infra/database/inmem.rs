//! In-memory [`Database`] implementation.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use common::operations::{By, Insert, Select, Update, UpdateIf};
use derive_more::{Display, Error as StdError};
use tokio::sync::RwLock;
use tracerr::Traced;

use crate::{
    domain::{
        motorcycle, order, partner, rental, DeliveryPartner, Motorcycle,
        Order, Rental,
    },
    infra::{database, Database},
    read,
};

/// In-memory [`Database`] keeping every collection behind a single lock.
#[derive(Clone, Debug, Default)]
pub struct InMemory(Arc<RwLock<Collections>>);

/// Collections stored by an [`InMemory`] database.
#[derive(Debug, Default)]
struct Collections {
    /// Stored [`Order`]s.
    orders: HashMap<order::Id, Order>,

    /// Stored [`DeliveryPartner`]s.
    partners: HashMap<partner::Id, DeliveryPartner>,

    /// Stored [`Rental`]s.
    rentals: HashMap<rental::Id, Rental>,

    /// Stored [`Motorcycle`]s.
    motorcycles: HashMap<motorcycle::Id, Motorcycle>,
}

/// In-memory database [`Error`].
///
/// [`Error`]: database::Error
#[derive(Clone, Debug, Display, StdError)]
pub enum Error {
    /// Stored value breaks a uniqueness guarantee.
    #[display("unique `{entity}` value is already stored: {value}")]
    UniqueViolation {
        /// Entity holding the guarantee.
        entity: &'static str,

        /// Violating value.
        value: String,
    },

    /// Value to update has never been stored.
    #[display("`{entity}` to update is missing: {value}")]
    Missing {
        /// Entity being updated.
        entity: &'static str,

        /// ID of the missing value.
        value: String,
    },
}

impl Database<Insert<Order>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(order): Insert<Order>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut store = self.0.write().await;
        if store.orders.values().any(|o| o.public_id == order.public_id) {
            return Err(tracerr::new!(database::Error::from(
                Error::UniqueViolation {
                    entity: "Order.public_id",
                    value: order.public_id.to_string(),
                }
            )));
        }
        drop(store.orders.insert(order.id, order));
        Ok(())
    }
}

impl Database<Select<By<Option<Order>, order::PublicId>>> for InMemory {
    type Ok = Option<Order>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Order>, order::PublicId>>,
    ) -> Result<Self::Ok, Self::Err> {
        let public_id = by.into_inner();
        Ok(self
            .0
            .read()
            .await
            .orders
            .values()
            .find(|o| o.public_id == public_id)
            .cloned())
    }
}

impl Database<Update<Order>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(order): Update<Order>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut store = self.0.write().await;
        if !store.orders.contains_key(&order.id) {
            return Err(tracerr::new!(database::Error::from(Error::Missing {
                entity: "Order",
                value: order.id.to_string(),
            })));
        }
        drop(store.orders.insert(order.id, order));
        Ok(())
    }
}

impl Database<UpdateIf<Order, order::Status>> for InMemory {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        UpdateIf(order, expected): UpdateIf<Order, order::Status>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut store = self.0.write().await;
        let Some(stored) = store.orders.get_mut(&order.id) else {
            return Ok(false);
        };
        if stored.status != expected {
            return Ok(false);
        }
        *stored = order;
        Ok(true)
    }
}

impl Database<Insert<DeliveryPartner>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(partner): Insert<DeliveryPartner>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut store = self.0.write().await;
        drop(store.partners.insert(partner.id, partner));
        Ok(())
    }
}

impl Database<Select<By<Option<DeliveryPartner>, partner::Id>>> for InMemory {
    type Ok = Option<DeliveryPartner>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<DeliveryPartner>, partner::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.0.read().await.partners.get(&by.into_inner()).cloned())
    }
}

impl Database<Update<DeliveryPartner>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(partner): Update<DeliveryPartner>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut store = self.0.write().await;
        if !store.partners.contains_key(&partner.id) {
            return Err(tracerr::new!(database::Error::from(Error::Missing {
                entity: "DeliveryPartner",
                value: partner.id.to_string(),
            })));
        }
        drop(store.partners.insert(partner.id, partner));
        Ok(())
    }
}

impl Database<Select<By<Vec<read::partner::Eligible<DeliveryPartner>>, ()>>>
    for InMemory
{
    type Ok = Vec<read::partner::Eligible<DeliveryPartner>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<Vec<read::partner::Eligible<DeliveryPartner>>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .0
            .read()
            .await
            .partners
            .values()
            .filter(|p| p.has_active_rental && p.is_available)
            .cloned()
            .map(read::partner::Eligible)
            .collect())
    }
}

impl Database<Select<By<Vec<DeliveryPartner>, HashSet<partner::Id>>>>
    for InMemory
{
    type Ok = Vec<DeliveryPartner>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<DeliveryPartner>, HashSet<partner::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        Ok(self
            .0
            .read()
            .await
            .partners
            .values()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }
}

impl Database<Insert<Rental>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(rental): Insert<Rental>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut store = self.0.write().await;
        drop(store.rentals.insert(rental.id, rental));
        Ok(())
    }
}

impl Database<Update<Rental>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(rental): Update<Rental>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut store = self.0.write().await;
        if !store.rentals.contains_key(&rental.id) {
            return Err(tracerr::new!(database::Error::from(Error::Missing {
                entity: "Rental",
                value: rental.id.to_string(),
            })));
        }
        drop(store.rentals.insert(rental.id, rental));
        Ok(())
    }
}

impl Database<Select<By<Option<read::rental::Ongoing<Rental>>, partner::Id>>>
    for InMemory
{
    type Ok = Option<read::rental::Ongoing<Rental>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Option<read::rental::Ongoing<Rental>>, partner::Id>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let partner = by.into_inner();
        Ok(self
            .0
            .read()
            .await
            .rentals
            .values()
            .find(|r| {
                r.partner == partner && r.status == rental::Status::Ongoing
            })
            .cloned()
            .map(read::rental::Ongoing))
    }
}

impl Database<Insert<Motorcycle>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(motorcycle): Insert<Motorcycle>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut store = self.0.write().await;
        if store
            .motorcycles
            .values()
            .any(|m| m.plate == motorcycle.plate)
        {
            return Err(tracerr::new!(database::Error::from(
                Error::UniqueViolation {
                    entity: "Motorcycle.plate",
                    value: motorcycle.plate.to_string(),
                }
            )));
        }
        drop(store.motorcycles.insert(motorcycle.id, motorcycle));
        Ok(())
    }
}

impl Database<Update<Motorcycle>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(motorcycle): Update<Motorcycle>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut store = self.0.write().await;
        if !store.motorcycles.contains_key(&motorcycle.id) {
            return Err(tracerr::new!(database::Error::from(Error::Missing {
                entity: "Motorcycle",
                value: motorcycle.id.to_string(),
            })));
        }
        drop(store.motorcycles.insert(motorcycle.id, motorcycle));
        Ok(())
    }
}

impl Database<Select<By<Option<read::motorcycle::Available<Motorcycle>>, ()>>>
    for InMemory
{
    type Ok = Option<read::motorcycle::Available<Motorcycle>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<
            By<Option<read::motorcycle::Available<Motorcycle>>, ()>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .0
            .read()
            .await
            .motorcycles
            .values()
            .find(|m| m.status == motorcycle::Status::Available)
            .cloned()
            .map(read::motorcycle::Available))
    }
}

impl Database<Select<By<Option<Motorcycle>, motorcycle::Id>>> for InMemory {
    type Ok = Option<Motorcycle>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Motorcycle>, motorcycle::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .0
            .read()
            .await
            .motorcycles
            .get(&by.into_inner())
            .cloned())
    }
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Insert, Select, Update, UpdateIf},
        Handler as _, Money,
    };

    use crate::domain::{
        order::{self, Order},
        Motorcycle,
    };

    use super::InMemory;

    fn order() -> Order {
        Order::new(Money::ZERO, order::Status::Available)
    }

    #[tokio::test]
    async fn insert_rejects_taken_public_id() {
        let db = InMemory::default();
        let stored = order();
        db.execute(Insert(stored.clone())).await.unwrap();

        let mut duplicate = order();
        duplicate.public_id = stored.public_id;

        let err = db.execute(Insert(duplicate)).await.unwrap_err();
        assert!(err.as_ref().is_unique_violation());
    }

    #[tokio::test]
    async fn selects_order_by_public_id() {
        let db = InMemory::default();
        let stored = order();
        db.execute(Insert(stored.clone())).await.unwrap();

        let found = db
            .execute(Select(By::<Option<Order>, _>::new(
                stored.public_id.clone(),
            )))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, stored.id);

        let missing = db
            .execute(Select(By::<Option<Order>, _>::new(
                order().public_id,
            )))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn conditional_update_checks_stored_status() {
        let db = InMemory::default();
        let mut stored = order();
        db.execute(Insert(stored.clone())).await.unwrap();

        stored.status = order::Status::Accepted;
        assert!(db
            .execute(UpdateIf(stored.clone(), order::Status::Available))
            .await
            .unwrap());

        // The witness no longer matches, so nothing is replaced.
        stored.status = order::Status::Delivered;
        assert!(!db
            .execute(UpdateIf(stored, order::Status::Available))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn updating_missing_motorcycle_fails() {
        let db = InMemory::default();
        let motorcycle =
            Motorcycle::new("CDX-0101".parse().expect("valid plate"));

        assert!(db.execute(Update(motorcycle)).await.is_err());
    }
}
