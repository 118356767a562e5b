//! [`Period`]-related definitions.

use derive_more::{Display, Error};
use rust_decimal::Decimal;

use crate::DateTime;

/// Inclusive period of time between two instants.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize)
)]
pub struct Period {
    /// Instant this [`Period`] starts at.
    #[cfg_attr(
        feature = "serde",
        serde(with = "crate::datetime::serde::unix_timestamp")
    )]
    start: DateTime,

    /// Instant this [`Period`] ends at.
    #[cfg_attr(
        feature = "serde",
        serde(with = "crate::datetime::serde::unix_timestamp")
    )]
    end: DateTime,
}

impl Period {
    /// Number of seconds in a single day.
    const SECONDS_PER_DAY: i64 = 86_400;

    /// Creates a new [`Period`] by checking its `start` doesn't exceed its
    /// `end`.
    ///
    /// # Errors
    ///
    /// If the `start` is later than the `end`.
    pub fn new(
        start: DateTime,
        end: DateTime,
    ) -> Result<Self, InvalidRangeError> {
        if start > end {
            Err(InvalidRangeError)
        } else {
            Ok(Self { start, end })
        }
    }

    /// Returns the instant this [`Period`] starts at.
    #[must_use]
    pub const fn start(&self) -> DateTime {
        self.start
    }

    /// Returns the instant this [`Period`] ends at.
    #[must_use]
    pub const fn end(&self) -> DateTime {
        self.end
    }

    /// Returns the number of days this [`Period`] lasts, including the
    /// fractional part.
    #[must_use]
    pub fn day_count(&self) -> Decimal {
        Decimal::from((self.end - self.start).whole_seconds())
            / Decimal::from(Self::SECONDS_PER_DAY)
    }

    /// Indicates whether the provided instant lies within this [`Period`].
    #[must_use]
    pub fn contains(&self, instant: DateTime) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Indicates whether this [`Period`] overlaps with the provided one,
    /// with touching boundaries counting as an overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Error of a [`Period`] starting after its end.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`Period` cannot start after its end")]
pub struct InvalidRangeError;
