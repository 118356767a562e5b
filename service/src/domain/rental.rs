//! [`Rental`] definitions.

use common::{define_kind, Money, Period};
use derive_more::{Display, From, FromStr, Into};
use rust_decimal::{prelude::ToPrimitive as _, Decimal};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{motorcycle, partner};

/// Motorcycle rental of a [`DeliveryPartner`].
///
/// [`DeliveryPartner`]: partner::DeliveryPartner
#[derive(Clone, Debug)]
pub struct Rental {
    /// ID of this [`Rental`].
    pub id: Id,

    /// [`DeliveryPartner`] renting the motorcycle.
    ///
    /// [`DeliveryPartner`]: partner::DeliveryPartner
    pub partner: partner::Id,

    /// [`Motorcycle`] being rented.
    ///
    /// [`Motorcycle`]: motorcycle::Motorcycle
    pub motorcycle: motorcycle::Id,

    /// [`Period`] this [`Rental`] covers.
    pub period: Period,

    /// [`Plan`] this [`Rental`] is priced by.
    pub plan: Plan,

    /// Cost of the whole planned [`Period`].
    pub base_cost: Money,

    /// Fee for returning the motorcycle off the planned [`Period`].
    pub fee_cost: Money,

    /// Current [`Status`] of this [`Rental`].
    pub status: Status,
}

impl Rental {
    /// Returns the total cost of this [`Rental`], rounded to cents.
    #[must_use]
    pub fn actual_cost(&self) -> Money {
        (self.base_cost + self.fee_cost).rounded()
    }
}

/// ID of a [`Rental`].
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

define_kind! {
    #[doc = "Plan a [`Rental`] is priced by, valued as its length in days."]
    enum Plan {
        #[doc = "Rental renewed every 7 days."]
        Weekly = 7,

        #[doc = "Rental renewed every 14 days."]
        Biweekly = 14,

        #[doc = "Rental renewed every 30 days."]
        Monthly = 30,
    }
}

impl Plan {
    /// Returns the length of a single renovation of this [`Plan`], in days.
    #[must_use]
    pub fn period_days(self) -> Decimal {
        self.u8().into()
    }

    /// Picks the [`Plan`] best covering the provided [`Period`].
    #[must_use]
    pub fn classify(period: &Period) -> Self {
        let days = period.day_count().trunc().to_i64().unwrap_or(i64::MAX);
        if days <= 7 {
            Self::Weekly
        } else if days < 30 {
            Self::Biweekly
        } else {
            Self::Monthly
        }
    }
}

define_kind! {
    #[doc = "Status of a [`Rental`]."]
    enum Status {
        #[doc = "Rental is in progress."]
        Ongoing = 1,

        #[doc = "Motorcycle was returned."]
        Finished = 2,
    }
}
