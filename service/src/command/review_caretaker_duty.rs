//! [`Command`] for reviewing a completed caretaker [`Duty`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime, Rating,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        caretaker::{duty, Duty},
        manager, property, user, User,
    },
    infra::{database, Database},
    read::Active,
    Service,
};

use super::{privilege, Command};

/// [`Command`] for a property manager to review a [`Duty`] completed by a
/// caretaker of their [`Property`].
///
/// [`Property`]: crate::domain::Property
#[derive(Clone, Debug)]
pub struct ReviewCaretakerDuty {
    /// ID of the [`Duty`] to review.
    pub duty_id: duty::Id,

    /// Feedback on the work done.
    pub feedback: Option<duty::Text>,

    /// [`Rating`] of the work done.
    pub rating: Rating,

    /// ID of the reviewing [`User`].
    pub initiator_id: user::Id,
}

impl<Db> Command<ReviewCaretakerDuty> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Active<manager::Assignment>>, property::Id>>,
            Ok = Option<Active<manager::Assignment>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Duty>, duty::Id>>,
            Ok = Option<Duty>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Duty>, duty::Id>>,
            Ok = Option<Duty>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Duty, duty::Id>>, Err = Traced<database::Error>>
        + Database<Update<Duty>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Duty;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ReviewCaretakerDuty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ReviewCaretakerDuty {
            duty_id,
            feedback,
            rating,
            initiator_id,
        } = cmd;

        let initiator = privilege::initiator(self.database(), initiator_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;
        let duty = self
            .database()
            .execute(Select(By::<Option<Duty>, _>::new(duty_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::DutyNotExists(duty_id))
            .map_err(tracerr::wrap!())?;
        if !privilege::manages(self.database(), &initiator, duty.property_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            return Err(tracerr::new!(E::UserNotManager(initiator_id)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Duty`.
        tx.execute(Lock(By::new(duty_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut duty = tx
            .execute(Select(By::<Option<Duty>, _>::new(duty_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::DutyNotExists(duty_id))
            .map_err(tracerr::wrap!())?;
        duty.review(feedback, rating, DateTime::now())
            .map_err(tracerr::from_and_wrap!(=> E))?;

        tx.execute(Update(duty.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(duty)
    }
}

/// Error of [`ReviewCaretakerDuty`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Duty`] with the provided ID does not exist.
    #[display("`Duty(id: {_0})` does not exist")]
    DutyNotExists(#[error(not(source))] duty::Id),

    /// [`Duty`] is not completed.
    #[display("Cannot review `Duty`: {_0}")]
    #[from]
    Status(duty::StatusError),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] does not manage the [`Property`] of the [`Duty`].
    ///
    /// [`Property`]: crate::domain::Property
    #[display("`User(id: {_0})` does not manage the `Property`")]
    UserNotManager(#[error(not(source))] user::Id),
}
