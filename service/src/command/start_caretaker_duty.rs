//! [`Command`] for starting a caretaker [`Duty`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        caretaker::{duty, Duty},
        user, Caretaker, User,
    },
    infra::{database, Database},
    Service,
};

use super::{privilege, Command};

/// [`Command`] for a [`Caretaker`] to start working on their [`Duty`].
#[derive(Clone, Copy, Debug)]
pub struct StartCaretakerDuty {
    /// ID of the [`Duty`] to start.
    pub duty_id: duty::Id,

    /// ID of the caretaker [`User`].
    pub initiator_id: user::Id,
}

impl<Db> Command<StartCaretakerDuty> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Caretaker>, user::Id>>,
            Ok = Option<Caretaker>,
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
        cmd: StartCaretakerDuty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let StartCaretakerDuty {
            duty_id,
            initiator_id,
        } = cmd;

        _ = privilege::initiator(self.database(), initiator_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;
        let caretaker = self
            .database()
            .execute(Select(By::<Option<Caretaker>, _>::new(initiator_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(Caretaker::is_active)
            .ok_or(E::UserNotCaretaker(initiator_id))
            .map_err(tracerr::wrap!())?;

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
            .filter(|d| d.caretaker_id == caretaker.id)
            .ok_or(E::DutyNotExists(duty_id))
            .map_err(tracerr::wrap!())?;
        duty.start(DateTime::now())
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

/// Error of [`StartCaretakerDuty`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Duty`] with the provided ID does not exist for the [`Caretaker`].
    #[display("`Duty(id: {_0})` does not exist")]
    DutyNotExists(#[error(not(source))] duty::Id),

    /// [`Duty`] cannot be started.
    #[display("Cannot start `Duty`: {_0}")]
    #[from]
    Status(duty::StatusError),

    /// [`User`] is not an active [`Caretaker`].
    #[display("`User(id: {_0})` is not an active `Caretaker`")]
    UserNotCaretaker(#[error(not(source))] user::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),
}
