//! [`Motorcycle`] definitions.

use std::str::FromStr;

use common::define_kind;
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Motorcycle available for renting.
#[derive(Clone, Debug)]
pub struct Motorcycle {
    /// ID of this [`Motorcycle`].
    pub id: Id,

    /// License [`Plate`] of this [`Motorcycle`].
    pub plate: Plate,

    /// Current [`Status`] of this [`Motorcycle`].
    pub status: Status,
}

impl Motorcycle {
    /// Creates a new [`Status::Available`] [`Motorcycle`] with the provided
    /// [`Plate`].
    #[must_use]
    pub fn new(plate: Plate) -> Self {
        Self {
            id: Id::new(),
            plate,
            status: Status::Available,
        }
    }
}

/// ID of a [`Motorcycle`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
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

/// License plate of a [`Motorcycle`].
#[derive(Clone, Debug, Display, Eq, Hash, PartialEq)]
pub struct Plate(String);

impl Plate {
    /// Creates a new [`Plate`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `plate` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(plate: impl Into<String>) -> Self {
        Self(plate.into())
    }

    /// Creates a new [`Plate`] if the given `plate` is valid.
    #[must_use]
    pub fn new(plate: impl Into<String>) -> Option<Self> {
        let plate = plate.into();
        Self::check(&plate).then_some(Self(plate))
    }

    /// Checks whether the given `plate` is a valid [`Plate`].
    fn check(plate: impl AsRef<str>) -> bool {
        let plate = plate.as_ref();
        !plate.is_empty()
            && plate.len() <= 10
            && plate
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
    }
}

impl FromStr for Plate {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Plate`")
    }
}

define_kind! {
    #[doc = "Status of a [`Motorcycle`]."]
    enum Status {
        #[doc = "Motorcycle can be rented."]
        Available = 1,

        #[doc = "Motorcycle is rented at the moment."]
        Rented = 2,
    }
}

#[cfg(test)]
mod spec {
    use super::Plate;

    #[test]
    fn plate_format() {
        assert!(Plate::new("CDX-0101").is_some());
        assert!(Plate::new("ABC1234").is_some());

        assert!(Plate::new("").is_none());
        assert!(Plate::new("WAY-TOO-LONG-PLATE").is_none());
        assert!(Plate::new("AB 1234").is_none());
    }
}
