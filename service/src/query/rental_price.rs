//! [`Query`] peeking a rental price.

use common::Period;
use tracerr::Traced;

use crate::{
    domain::rental::Plan,
    pricing::{self, Cost},
    Service,
};

use super::Query;

/// [`Query`] peeking the [`Cost`] of renting over a [`Period`], without
/// touching any stored state.
#[derive(Clone, Copy, Debug)]
pub struct RentalPrice {
    /// [`Period`] to price.
    pub period: Period,

    /// Explicitly picked [`Plan`], if any.
    pub plan: Option<Plan>,
}

impl<Db, Mq> Query<RentalPrice> for Service<Db, Mq> {
    type Ok = Cost;
    type Err = Traced<pricing::NoCalculatorError>;

    async fn execute(
        &self,
        RentalPrice { period, plan }: RentalPrice,
    ) -> Result<Self::Ok, Self::Err> {
        let plan = plan.unwrap_or_else(|| Plan::classify(&period));
        let cost = self
            .config()
            .calculators
            .resolve(plan)
            .map_err(|e| tracerr::new!(e))?
            .calculate(&period, &self.config().pricing);
        Ok(cost)
    }
}
