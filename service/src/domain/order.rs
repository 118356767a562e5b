//! [`Order`] definitions.

use std::collections::HashSet;

use common::{define_kind, unit, DateTimeOf, Money};
#[cfg(doc)]
use common::DateTime;
use derive_more::{AsRef, Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::partner;

/// Delivery order placed on the platform.
#[derive(Clone, Debug)]
pub struct Order {
    /// ID of this [`Order`].
    pub id: Id,

    /// [`PublicId`] of this [`Order`].
    pub public_id: PublicId,

    /// Amount paid to the partner delivering this [`Order`].
    pub delivery_cost: Money,

    /// [`DateTime`] when this [`Order`] was created.
    pub created_at: CreationDateTime,

    /// Current [`Status`] of this [`Order`].
    pub status: Status,

    /// Partner this [`Order`] is assigned to, if any.
    pub assigned_partner: Option<partner::Id>,

    /// Partners already notified about this [`Order`].
    pub notified_partners: HashSet<partner::Id>,
}

impl Order {
    /// Creates a new [`Order`] with the provided parameters.
    #[must_use]
    pub fn new(delivery_cost: Money, status: Status) -> Self {
        let id = Id::new();
        Self {
            id,
            public_id: id.into(),
            delivery_cost,
            created_at: DateTimeOf::now(),
            status,
            assigned_partner: None,
            notified_partners: HashSet::new(),
        }
    }

    /// Indicates whether this [`Order`] still awaits a delivery partner.
    #[must_use]
    pub fn is_available_to_delivery(&self) -> bool {
        self.status == Status::Available && self.assigned_partner.is_none()
    }

    /// Indicates whether partners can still be notified about this [`Order`].
    ///
    /// Notifying is a one-shot action: once any partner has been notified,
    /// repeated deliveries of the same event are discarded.
    #[must_use]
    pub fn can_partners_be_notified(&self) -> bool {
        self.is_available_to_delivery() && self.notified_partners.is_empty()
    }

    /// Indicates whether the [`Status`] of this [`Order`] can change to the
    /// provided one at all.
    ///
    /// Repeating the current [`Status`] is not a change, and a
    /// [`Status::Delivered`] [`Order`] is final.
    #[must_use]
    pub fn can_update_status(&self, incoming: Status) -> bool {
        self.status != incoming && self.status != Status::Delivered
    }

    /// Indicates whether the provided partner can accept this [`Order`].
    #[must_use]
    pub fn can_be_accepted_by(
        &self,
        partner: &partner::DeliveryPartner,
    ) -> bool {
        self.status == Status::Available
            && partner.can_accept_order(&self.public_id)
    }

    /// Indicates whether the provided partner can mark this [`Order`] as
    /// [`Status::Delivered`].
    ///
    /// Only the busy partner that accepted this [`Order`] before can finish
    /// it.
    #[must_use]
    pub fn can_be_delivered_by(
        &self,
        partner: &partner::DeliveryPartner,
    ) -> bool {
        self.status == Status::Accepted && !partner.is_available
    }

    /// Indicates whether changing to the provided [`Status`] withdraws a
    /// previously accepted assignment.
    #[must_use]
    pub fn is_withdrawal(&self, incoming: Status) -> bool {
        self.status == Status::Accepted && incoming == Status::Available
    }

    /// Builds a [`Notification`] about this [`Order`].
    #[must_use]
    pub fn notification(&self) -> Notification {
        Notification {
            public_id: self.public_id.clone(),
            delivery_cost: self.delivery_cost,
            created_at: self.created_at.coerce(),
        }
    }
}

/// ID of an [`Order`].
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

/// Human-friendly ID of an [`Order`], shared with delivery partners.
///
/// Derived from the [`Id`] deterministically, so the same [`Order`] always
/// renders the same [`PublicId`].
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    Hash,
    PartialEq,
    Serialize,
)]
#[as_ref(str, String)]
pub struct PublicId(String);

impl From<Id> for PublicId {
    fn from(id: Id) -> Self {
        /// Digits used by the base62 encoding.
        const ALPHABET: &[u8; 62] =
            b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ\
              abcdefghijklmnopqrstuvwxyz";
        /// Length the base62 encoding is padded to.
        const PADDED_LEN: usize = 24;
        /// Length of a single dash-separated chunk.
        const CHUNK_LEN: usize = 4;

        let mut value = u128::from_be_bytes(*Uuid::from(id).as_bytes());
        let mut digits = Vec::with_capacity(PADDED_LEN);
        while value > 0 {
            let rem = usize::try_from(value % 62).expect("below 62");
            digits.push(ALPHABET[rem]);
            value /= 62;
        }
        digits.resize(PADDED_LEN, b'0');
        digits.reverse();

        let encoded = String::from_utf8(digits)
            .expect("base62 digits are ASCII")
            .to_uppercase();
        Self(
            encoded
                .as_bytes()
                .chunks(CHUNK_LEN)
                .map(|c| String::from_utf8_lossy(c).into_owned())
                .collect::<Vec<_>>()
                .join("-"),
        )
    }
}

define_kind! {
    #[doc = "Status of an [`Order`]."]
    enum Status {
        #[doc = "Order awaits a delivery partner."]
        Available = 1,

        #[doc = "Order was accepted by a delivery partner."]
        Accepted = 2,

        #[doc = "Order was delivered. Final."]
        Delivered = 3,
    }
}

/// Notification about an [`Order`] awaiting delivery, fanned out to eligible
/// partners.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Notification {
    /// [`PublicId`] of the awaiting [`Order`].
    pub public_id: PublicId,

    /// Amount paid for delivering the [`Order`].
    pub delivery_cost: Money,

    /// [`DateTime`] when the [`Order`] was created.
    #[serde(with = "common::datetime::serde::unix_timestamp")]
    pub created_at: NotifiedDateTime,
}

/// [`DateTime`] when an [`Order`] was created.
pub type CreationDateTime = DateTimeOf<(Order, unit::Creation)>;

/// [`DateTime`] carried by a [`Notification`].
pub type NotifiedDateTime = DateTimeOf<(Notification, unit::Creation)>;

#[cfg(test)]
mod spec {
    use common::Money;
    use uuid::Uuid;

    use crate::domain::partner::DeliveryPartner;

    use super::{Id, Order, PublicId, Status};

    fn order(status: Status) -> Order {
        Order::new(Money::ZERO, status)
    }

    fn eligible_partner(order: &Order) -> DeliveryPartner {
        let mut partner = DeliveryPartner::new();
        partner.has_active_rental = true;
        partner.is_available = true;
        partner.notify(order.notification());
        partner
    }

    #[test]
    fn public_id_of_nil_uuid_is_all_zeros() {
        let id = Id::from(Uuid::nil());

        assert_eq!(
            PublicId::from(id).to_string(),
            "0000-0000-0000-0000-0000-0000",
        );
    }

    #[test]
    fn public_id_is_deterministic() {
        let id = Id::new();

        assert_eq!(PublicId::from(id), PublicId::from(id));
        assert_ne!(PublicId::from(id), PublicId::from(Id::new()));
    }

    #[test]
    fn public_id_has_uppercase_chunks_of_four() {
        let public_id = PublicId::from(Id::new()).to_string();
        let chunks = public_id.split('-').collect::<Vec<_>>();

        assert_eq!(chunks.len(), 6);
        for chunk in chunks {
            assert_eq!(chunk.len(), 4);
            assert!(chunk
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn repeated_status_is_not_an_update() {
        assert!(!order(Status::Available).can_update_status(Status::Available));
        assert!(!order(Status::Accepted).can_update_status(Status::Accepted));
    }

    #[test]
    fn delivered_order_is_final() {
        let delivered = order(Status::Delivered);

        assert!(!delivered.can_update_status(Status::Available));
        assert!(!delivered.can_update_status(Status::Accepted));
        assert!(!delivered.can_update_status(Status::Delivered));
    }

    #[test]
    fn only_notified_renting_partner_accepts() {
        let order = order(Status::Available);
        let eligible = eligible_partner(&order);
        assert!(order.can_be_accepted_by(&eligible));

        let mut not_notified = eligible.clone();
        not_notified.remove_notification(&order.public_id);
        assert!(!order.can_be_accepted_by(&not_notified));

        let mut without_rental = eligible.clone();
        without_rental.has_active_rental = false;
        assert!(!order.can_be_accepted_by(&without_rental));

        let mut busy = eligible;
        busy.is_available = false;
        assert!(!order.can_be_accepted_by(&busy));
    }

    #[test]
    fn only_busy_partner_delivers_accepted_order() {
        let accepted = order(Status::Accepted);

        let mut partner = eligible_partner(&accepted);
        partner.is_available = false;
        assert!(accepted.can_be_delivered_by(&partner));

        partner.is_available = true;
        assert!(!accepted.can_be_delivered_by(&partner));

        let mut busy = eligible_partner(&accepted);
        busy.is_available = false;
        assert!(!order(Status::Available).can_be_delivered_by(&busy));
    }

    #[test]
    fn accepted_to_available_is_withdrawal() {
        assert!(order(Status::Accepted).is_withdrawal(Status::Available));
        assert!(!order(Status::Accepted).is_withdrawal(Status::Delivered));
        assert!(!order(Status::Available).is_withdrawal(Status::Available));
    }

    #[test]
    fn notifying_is_one_shot() {
        let mut order = order(Status::Available);
        assert!(order.can_partners_be_notified());

        assert!(order.notified_partners.insert(DeliveryPartner::new().id));
        assert!(!order.can_partners_be_notified());
    }
}
