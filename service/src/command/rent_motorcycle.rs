//! [`Command`] for renting a [`Motorcycle`].

use common::{
    operations::{By, Insert, Select, Update},
    Period,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        motorcycle, partner,
        rental::{self, Plan},
        DeliveryPartner, Motorcycle, Rental,
    },
    infra::{database, Database},
    pricing, read, Service,
};

use super::Command;

/// [`Command`] for renting a [`Motorcycle`] to a [`DeliveryPartner`].
///
/// The first [`Motorcycle`] still available is handed out. Without an
/// explicitly picked [`Plan`] the cheapest one covering the [`Period`] is
/// classified from its length.
#[derive(Clone, Copy, Debug)]
pub struct RentMotorcycle {
    /// [`partner::Id`] of the renting [`DeliveryPartner`].
    pub partner: partner::Id,

    /// [`Period`] to rent over.
    pub period: Period,

    /// Explicitly picked [`Plan`], if any.
    pub plan: Option<Plan>,
}

impl<Db, Mq> Command<RentMotorcycle> for Service<Db, Mq>
where
    Db: Database<
            Select<By<Option<DeliveryPartner>, partner::Id>>,
            Ok = Option<DeliveryPartner>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<read::motorcycle::Available<Motorcycle>>, ()>>,
            Ok = Option<read::motorcycle::Available<Motorcycle>>,
            Err = Traced<database::Error>,
        > + Database<Insert<Rental>, Ok = (), Err = Traced<database::Error>>
        + Database<Update<Motorcycle>, Ok = (), Err = Traced<database::Error>>
        + Database<
            Update<DeliveryPartner>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
{
    type Ok = Rental;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RentMotorcycle,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RentMotorcycle {
            partner: partner_id,
            period,
            plan,
        } = cmd;

        let mut partner = self
            .database()
            .execute(Select(By::new(partner_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::PartnerNotFound(partner_id)))?;
        if !partner.can_rent() {
            return Err(tracerr::new!(E::OngoingRental(partner_id)));
        }

        let plan = plan.unwrap_or_else(|| Plan::classify(&period));
        let cost = self
            .config()
            .calculators
            .resolve(plan)
            .map_err(|e| tracerr::new!(E::Pricing(e)))?
            .calculate(&period, &self.config().pricing);

        let read::motorcycle::Available(mut motorcycle) = self
            .database()
            .execute(Select(By::new(())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::NoMotorcyclesAvailable))?;

        let rental = Rental {
            id: rental::Id::new(),
            partner: partner.id,
            motorcycle: motorcycle.id,
            period,
            plan,
            base_cost: cost.base,
            fee_cost: cost.fee,
            status: rental::Status::Ongoing,
        };

        self.database()
            .execute(Insert(rental.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        motorcycle.status = motorcycle::Status::Rented;
        self.database()
            .execute(Update(motorcycle))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        partner.has_active_rental = true;
        partner.is_available = true;
        self.database()
            .execute(Update(partner))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(rental)
    }
}

/// Error of [`RentMotorcycle`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`DeliveryPartner`] does not exist.
    #[display("partner `{_0}` does not exist")]
    PartnerNotFound(#[error(not(source))] partner::Id),

    /// [`DeliveryPartner`] rents a [`Motorcycle`] already.
    #[display("partner `{_0}` has an ongoing rental")]
    OngoingRental(#[error(not(source))] partner::Id),

    /// No [`Motorcycle`] is available for renting.
    #[display("no motorcycles are available")]
    NoMotorcyclesAvailable,

    /// No calculator can price the picked [`Plan`].
    #[display("cannot price the rental: {_0}")]
    #[from]
    Pricing(pricing::NoCalculatorError),
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{
        operations::{By, Insert, Select},
        DateTime, Handler as _, Money, Period,
    };
    use rust_decimal::Decimal;

    use crate::{
        domain::{
            motorcycle, order,
            rental::{self, Plan},
            DeliveryPartner, Motorcycle,
        },
        infra::{database, queue},
        pricing, Config, Service,
    };

    use super::{ExecutionError, RentMotorcycle};

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

    fn period(days: u64) -> Period {
        let start = DateTime::UNIX_EPOCH;
        Period::new(start, start + Duration::from_secs(days * 86_400))
            .unwrap()
    }

    #[tokio::test]
    async fn rents_first_available_motorcycle() {
        let service = service();
        let partner = DeliveryPartner::new();
        service
            .database()
            .execute(Insert(partner.clone()))
            .await
            .unwrap();
        service
            .database()
            .execute(Insert(Motorcycle::new(
                "CDX-0101".parse().expect("valid plate"),
            )))
            .await
            .unwrap();

        let rental = service
            .execute(RentMotorcycle {
                partner: partner.id,
                period: period(7),
                plan: None,
            })
            .await
            .unwrap();

        assert_eq!(rental.plan, Plan::Weekly);
        assert_eq!(rental.base_cost, Money::new(Decimal::from(210)));
        assert_eq!(rental.status, rental::Status::Ongoing);

        let motorcycle = service
            .database()
            .execute(Select(By::<Option<Motorcycle>, _>::new(
                rental.motorcycle,
            )))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(motorcycle.status, motorcycle::Status::Rented);

        let partner = service
            .database()
            .execute(Select(By::<Option<DeliveryPartner>, _>::new(partner.id)))
            .await
            .unwrap()
            .unwrap();
        assert!(partner.has_active_rental);
        assert!(partner.is_available);
    }

    #[tokio::test]
    async fn second_rental_is_rejected() {
        let service = service();
        let mut partner = DeliveryPartner::new();
        partner.has_active_rental = true;
        service
            .database()
            .execute(Insert(partner.clone()))
            .await
            .unwrap();

        let err = service
            .execute(RentMotorcycle {
                partner: partner.id,
                period: period(7),
                plan: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::OngoingRental(..)));
    }

    #[tokio::test]
    async fn no_motorcycles_is_reported() {
        let service = service();
        let partner = DeliveryPartner::new();
        service
            .database()
            .execute(Insert(partner.clone()))
            .await
            .unwrap();

        let err = service
            .execute(RentMotorcycle {
                partner: partner.id,
                period: period(7),
                plan: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::NoMotorcyclesAvailable,
        ));
    }
}
