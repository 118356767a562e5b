//! [`Command`] for creating a new [`Order`].

use common::{
    operations::{Insert, Publish},
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{order, Order},
    infra::{database, queue, Database, Queue},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Order`].
///
/// An [`Order`] created in the [`order::Status::Available`] status is
/// published for dispatching to eligible partners right away.
#[derive(Clone, Copy, Debug)]
pub struct CreateOrder {
    /// Amount paid for delivering the new [`Order`].
    pub delivery_cost: Money,

    /// Initial [`order::Status`] of the new [`Order`].
    pub status: order::Status,
}

impl<Db, Mq> Command<CreateOrder> for Service<Db, Mq>
where
    Db: Database<Insert<Order>, Ok = (), Err = Traced<database::Error>>,
    Mq: Queue<
        Publish<order::Notification>,
        Ok = (),
        Err = Traced<queue::Error>,
    >,
{
    type Ok = Order;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateOrder) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let order = Order::new(cmd.delivery_cost, cmd.status);

        self.database()
            .execute(Insert(order.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        if order.is_available_to_delivery() {
            self.queue()
                .execute(Publish(order.notification()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
        }

        Ok(order)
    }
}

/// Error of [`CreateOrder`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Generated [`order::PublicId`] is occupied by another [`Order`].
    #[display("generated public ID is occupied already")]
    PublicIdTaken,

    /// [`Queue`] error.
    #[display("`Queue` operation failed: {_0}")]
    #[from]
    Queue(queue::Error),
}

impl From<database::Error> for ExecutionError {
    fn from(e: database::Error) -> Self {
        if e.is_unique_violation() {
            Self::PublicIdTaken
        } else {
            Self::Db(e)
        }
    }
}
