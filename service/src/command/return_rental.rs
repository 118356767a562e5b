//! [`Command`] for returning a rented [`Motorcycle`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{motorcycle, partner, rental, DeliveryPartner, Motorcycle, Rental},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for returning a rented [`Motorcycle`], finishing the ongoing
/// [`Rental`] of a [`DeliveryPartner`].
#[derive(Clone, Copy, Debug)]
pub struct ReturnRental {
    /// [`partner::Id`] of the returning [`DeliveryPartner`].
    pub partner: partner::Id,
}

impl<Db, Mq> Command<ReturnRental> for Service<Db, Mq>
where
    Db: Database<
            Select<By<Option<DeliveryPartner>, partner::Id>>,
            Ok = Option<DeliveryPartner>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<read::rental::Ongoing<Rental>>, partner::Id>>,
            Ok = Option<read::rental::Ongoing<Rental>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Motorcycle>, motorcycle::Id>>,
            Ok = Option<Motorcycle>,
            Err = Traced<database::Error>,
        > + Database<Update<Rental>, Ok = (), Err = Traced<database::Error>>
        + Database<Update<Motorcycle>, Ok = (), Err = Traced<database::Error>>
        + Database<
            Update<DeliveryPartner>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
{
    type Ok = Rental;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: ReturnRental) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let partner_id = cmd.partner;

        let mut partner = self
            .database()
            .execute(Select(By::<Option<DeliveryPartner>, _>::new(partner_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::PartnerNotFound(partner_id)))?;

        let read::rental::Ongoing(mut rental) = self
            .database()
            .execute(Select(By::<
                Option<read::rental::Ongoing<Rental>>,
                _,
            >::new(partner_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| tracerr::new!(E::NoOngoingRental(partner_id)))?;

        rental.status = rental::Status::Finished;
        self.database()
            .execute(Update(rental.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        if let Some(mut motorcycle) = self
            .database()
            .execute(Select(By::new(rental.motorcycle)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            motorcycle.status = motorcycle::Status::Available;
            self.database()
                .execute(Update(motorcycle))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
        }

        partner.has_active_rental = false;
        partner.is_available = false;
        self.database()
            .execute(Update(partner))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(rental)
    }
}

/// Error of [`ReturnRental`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`DeliveryPartner`] does not exist.
    #[display("partner `{_0}` does not exist")]
    PartnerNotFound(#[error(not(source))] partner::Id),

    /// [`DeliveryPartner`] has no ongoing [`Rental`].
    #[display("partner `{_0}` has no ongoing rental")]
    NoOngoingRental(#[error(not(source))] partner::Id),
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{
        operations::{By, Insert, Select},
        DateTime, Handler as _, Period,
    };

    use crate::{
        domain::{
            motorcycle, order, rental, DeliveryPartner, Motorcycle,
        },
        infra::{database, queue},
        pricing, Config, Service,
    };

    use super::{ExecutionError, ReturnRental};

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
    async fn finishes_rental_and_releases_everything() {
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

        let start = DateTime::UNIX_EPOCH;
        let rented = service
            .execute(crate::command::RentMotorcycle {
                partner: partner.id,
                period: Period::new(
                    start,
                    start + Duration::from_secs(7 * 86_400),
                )
                .unwrap(),
                plan: None,
            })
            .await
            .unwrap();

        let returned = service
            .execute(ReturnRental {
                partner: partner.id,
            })
            .await
            .unwrap();

        assert_eq!(returned.id, rented.id);
        assert_eq!(returned.status, rental::Status::Finished);

        let motorcycle = service
            .database()
            .execute(Select(By::<Option<Motorcycle>, _>::new(
                returned.motorcycle,
            )))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(motorcycle.status, motorcycle::Status::Available);

        let partner = service
            .database()
            .execute(Select(By::<Option<DeliveryPartner>, _>::new(partner.id)))
            .await
            .unwrap()
            .unwrap();
        assert!(!partner.has_active_rental);
        assert!(!partner.is_available);
    }

    #[tokio::test]
    async fn returning_without_rental_is_rejected() {
        let service = service();
        let partner = DeliveryPartner::new();
        service
            .database()
            .execute(Insert(partner.clone()))
            .await
            .unwrap();

        let err = service
            .execute(ReturnRental {
                partner: partner.id,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NoOngoingRental(..)));
    }
}
