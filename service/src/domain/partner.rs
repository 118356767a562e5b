//! [`DeliveryPartner`] definitions.

use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::order;

/// Partner delivering [`Order`]s on a rented motorcycle.
///
/// [`Order`]: order::Order
#[derive(Clone, Debug)]
pub struct DeliveryPartner {
    /// ID of this [`DeliveryPartner`].
    pub id: Id,

    /// Indicates whether this [`DeliveryPartner`] is free to take an
    /// [`Order`].
    ///
    /// [`Order`]: order::Order
    pub is_available: bool,

    /// Indicates whether this [`DeliveryPartner`] rents a motorcycle at the
    /// moment.
    pub has_active_rental: bool,

    /// [`order::Notification`]s received by this [`DeliveryPartner`].
    pub notifications: Vec<order::Notification>,
}

impl DeliveryPartner {
    /// Creates a new [`DeliveryPartner`] without a rental and without
    /// notifications.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Id::new(),
            is_available: false,
            has_active_rental: false,
            notifications: Vec::new(),
        }
    }

    /// Indicates whether this [`DeliveryPartner`] can accept the [`Order`]
    /// with the provided [`order::PublicId`].
    ///
    /// Accepting requires an active motorcycle rental, a received
    /// notification about the [`Order`], and no other delivery in progress.
    ///
    /// [`Order`]: order::Order
    #[must_use]
    pub fn can_accept_order(&self, public_id: &order::PublicId) -> bool {
        self.has_active_rental
            && self.is_notified_about(public_id)
            && self.is_available
    }

    /// Indicates whether this [`DeliveryPartner`] was notified about the
    /// [`Order`] with the provided [`order::PublicId`].
    ///
    /// [`Order`]: order::Order
    #[must_use]
    pub fn is_notified_about(&self, public_id: &order::PublicId) -> bool {
        self.notifications.iter().any(|n| &n.public_id == public_id)
    }

    /// Indicates whether this [`DeliveryPartner`] can rent a motorcycle.
    #[must_use]
    pub fn can_rent(&self) -> bool {
        !self.has_active_rental
    }

    /// Records the provided [`order::Notification`], ignoring a duplicate
    /// one.
    pub fn notify(&mut self, notification: order::Notification) {
        if !self.is_notified_about(&notification.public_id) {
            self.notifications.push(notification);
        }
    }

    /// Removes the [`order::Notification`] about the [`Order`] with the
    /// provided [`order::PublicId`], if there is one.
    ///
    /// [`Order`]: order::Order
    pub fn remove_notification(&mut self, public_id: &order::PublicId) {
        self.notifications.retain(|n| &n.public_id != public_id);
    }
}

impl Default for DeliveryPartner {
    fn default() -> Self {
        Self::new()
    }
}

/// ID of a [`DeliveryPartner`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

#[cfg(test)]
mod spec {
    use common::Money;

    use crate::domain::order::{Order, Status};

    use super::DeliveryPartner;

    #[test]
    fn duplicate_notifications_are_ignored() {
        let order = Order::new(Money::ZERO, Status::Available);
        let mut partner = DeliveryPartner::new();

        partner.notify(order.notification());
        partner.notify(order.notification());

        assert_eq!(partner.notifications.len(), 1);
    }

    #[test]
    fn removing_notification_forgets_the_order() {
        let order = Order::new(Money::ZERO, Status::Available);
        let mut partner = DeliveryPartner::new();
        partner.notify(order.notification());
        assert!(partner.is_notified_about(&order.public_id));

        partner.remove_notification(&order.public_id);

        assert!(!partner.is_notified_about(&order.public_id));
    }

    #[test]
    fn active_rental_blocks_another_one() {
        let mut partner = DeliveryPartner::new();
        assert!(partner.can_rent());

        partner.has_active_rental = true;

        assert!(!partner.can_rent());
    }
}
