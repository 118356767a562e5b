//! Rental cost calculation.

use std::time::Duration;

use common::{Money, Percent, Period};
use derive_more::{Display, Error};
use rust_decimal::{
    prelude::ToPrimitive as _, Decimal, RoundingStrategy,
};

use crate::domain::rental::Plan;

/// Number of seconds in a single day.
const SECONDS_PER_DAY: u64 = 86_400;

/// Pricing options of a single [`Plan`].
#[derive(Clone, Copy, Debug)]
pub struct PlanOptions {
    /// Cost of a single rental day.
    pub daily_cost: Money,

    /// Percent of the remaining daily costs charged when the motorcycle is
    /// returned before the planned period ends.
    pub early_return_fee: Percent,
}

/// Pricing options of all the [`Plan`]s.
#[derive(Clone, Copy, Debug)]
pub struct Options {
    /// [`Plan::Weekly`] pricing.
    pub weekly: PlanOptions,

    /// [`Plan::Biweekly`] pricing.
    pub biweekly: PlanOptions,

    /// [`Plan::Monthly`] pricing.
    pub monthly: PlanOptions,

    /// Flat fee charged per day when the motorcycle is returned after the
    /// planned period ends.
    pub daily_exceeded_fee: Money,
}

impl Options {
    /// Returns the [`PlanOptions`] of the provided [`Plan`].
    #[must_use]
    pub fn plan(&self, plan: Plan) -> PlanOptions {
        match plan {
            Plan::Weekly => self.weekly,
            Plan::Biweekly => self.biweekly,
            Plan::Monthly => self.monthly,
        }
    }
}

/// Cost of a [`Rental`], split into its parts.
///
/// [`Rental`]: crate::domain::Rental
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Cost {
    /// Cost of the whole planned period.
    pub base: Money,

    /// Fee for returning the motorcycle off the planned period.
    pub fee: Money,
}

impl Cost {
    /// Returns the total cost, rounded to cents.
    #[must_use]
    pub fn actual(&self) -> Money {
        (self.base + self.fee).rounded()
    }
}

/// Calculator of a [`Rental`] cost under a single [`Plan`].
///
/// [`Rental`]: crate::domain::Rental
#[derive(Clone, Copy, Debug)]
pub struct Calculator {
    /// [`Plan`] this [`Calculator`] prices.
    plan: Plan,
}

impl Calculator {
    /// Creates a new [`Calculator`] pricing the provided [`Plan`].
    #[must_use]
    pub const fn new(plan: Plan) -> Self {
        Self { plan }
    }

    /// Indicates whether this [`Calculator`] prices the provided [`Plan`].
    #[must_use]
    pub fn can_calculate(&self, plan: Plan) -> bool {
        self.plan == plan
    }

    /// Calculates the [`Cost`] of renting over the provided [`Period`].
    ///
    /// The planned period is a whole number of [`Plan`] renovations, at
    /// least one. Days past the planned period are charged the flat
    /// [`Options::daily_exceeded_fee`], days short of it the
    /// [`PlanOptions::early_return_fee`] percent of the daily cost.
    #[must_use]
    pub fn calculate(&self, period: &Period, options: &Options) -> Cost {
        let PlanOptions {
            daily_cost,
            early_return_fee,
        } = options.plan(self.plan);
        let plan_days = self.plan.period_days();

        let days = round_days(period.day_count());
        let renovations = (Decimal::from(days) / plan_days)
            .floor()
            .max(Decimal::ONE);
        let planned_days = renovations * plan_days;

        let base = (daily_cost * planned_days).rounded();

        let expected_return = period.start()
            + Duration::from_secs(
                planned_days.to_u64().expect("positive whole days")
                    * SECONDS_PER_DAY,
            );
        let overrun = Decimal::from(
            (period.end() - expected_return).whole_seconds(),
        ) / Decimal::from(SECONDS_PER_DAY);

        let exceeded_days = round_days(overrun).max(0);
        let early_days = round_days(-overrun).max(0);

        let fee = options.daily_exceeded_fee * Decimal::from(exceeded_days)
            + daily_cost
                * (Decimal::from(early_days) * early_return_fee.fraction());

        Cost { base, fee }
    }
}

/// Rounds the provided fractional day count to whole days, with midpoints
/// rounded away from zero.
fn round_days(days: Decimal) -> i64 {
    days.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .expect("day count fits into `i64`")
}

/// Registry of [`Calculator`]s, one per [`Plan`].
#[derive(Clone, Debug)]
pub struct Calculators(Vec<Calculator>);

impl Calculators {
    /// Resolves the [`Calculator`] pricing the provided [`Plan`].
    ///
    /// # Errors
    ///
    /// If no registered [`Calculator`] prices the [`Plan`].
    pub fn resolve(&self, plan: Plan) -> Result<&Calculator, NoCalculatorError> {
        self.0
            .iter()
            .find(|c| c.can_calculate(plan))
            .ok_or(NoCalculatorError(plan))
    }
}

impl Default for Calculators {
    fn default() -> Self {
        Self(vec![
            Calculator::new(Plan::Weekly),
            Calculator::new(Plan::Biweekly),
            Calculator::new(Plan::Monthly),
        ])
    }
}

/// [`Options`] used across unit tests.
#[cfg(test)]
pub(crate) fn test_options() -> Options {
    use rust_decimal::Decimal;

    let percent = |n: u32| {
        common::Percent::new(Decimal::from(n)).expect("valid percent")
    };
    Options {
        weekly: PlanOptions {
            daily_cost: Money::new(Decimal::from(30)),
            early_return_fee: percent(20),
        },
        biweekly: PlanOptions {
            daily_cost: Money::new(Decimal::from(28)),
            early_return_fee: percent(40),
        },
        monthly: PlanOptions {
            daily_cost: Money::new(Decimal::from(22)),
            early_return_fee: percent(60),
        },
        daily_exceeded_fee: Money::new(Decimal::from(50)),
    }
}

/// Error of no [`Calculator`] being registered for a [`Plan`].
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("no calculator can price `{_0}` plan")]
pub struct NoCalculatorError(#[error(not(source))] pub Plan);
