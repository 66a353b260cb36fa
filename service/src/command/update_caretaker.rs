//! [`Command`] for updating a [`Caretaker`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Rating,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{caretaker, manager, property, user, Caretaker, User},
    infra::{database, Database},
    read::Active,
    Service,
};

use super::{privilege, Command};

/// [`Command`] for suspending or reactivating a [`Caretaker`], and
/// evaluating their performance.
#[derive(Clone, Copy, Debug)]
pub struct UpdateCaretaker {
    /// ID of the [`Caretaker`] to update.
    pub caretaker_id: caretaker::Id,

    /// New [`caretaker::Status`].
    pub status: Option<caretaker::Status>,

    /// New performance [`Rating`].
    pub performance_rating: Option<Rating>,

    /// ID of the [`User`] updating the [`Caretaker`].
    pub initiator_id: user::Id,
}

impl<Db> Command<UpdateCaretaker> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Caretaker>, caretaker::Id>>,
            Ok = Option<Caretaker>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Active<manager::Assignment>>, property::Id>>,
            Ok = Option<Active<manager::Assignment>>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Caretaker>, caretaker::Id>>,
            Ok = Option<Caretaker>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Caretaker, caretaker::Id>>,
            Err = Traced<database::Error>,
        > + Database<Update<Caretaker>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Caretaker;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateCaretaker,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateCaretaker {
            caretaker_id,
            status,
            performance_rating,
            initiator_id,
        } = cmd;

        let initiator = privilege::initiator(self.database(), initiator_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;
        let caretaker = self
            .database()
            .execute(Select(By::<Option<Caretaker>, _>::new(caretaker_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CaretakerNotExists(caretaker_id))
            .map_err(tracerr::wrap!())?;
        if !privilege::supervises(self.database(), &initiator, &caretaker)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            return Err(tracerr::new!(E::UserNotSupervisor(initiator_id)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Caretaker`.
        tx.execute(Lock(By::new(caretaker_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut caretaker = tx
            .execute(Select(By::<Option<Caretaker>, _>::new(caretaker_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CaretakerNotExists(caretaker_id))
            .map_err(tracerr::wrap!())?;
        if let Some(status) = status {
            caretaker.status = status;
        }
        if let Some(rating) = performance_rating {
            caretaker.performance_rating = Some(rating);
        }

        tx.execute(Update(caretaker.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(caretaker)
    }
}

/// Error of [`UpdateCaretaker`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Caretaker`] with the provided ID does not exist.
    #[display("`Caretaker(id: {_0})` does not exist")]
    CaretakerNotExists(#[error(not(source))] caretaker::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] does not supervise the [`Caretaker`].
    #[display("`User(id: {_0})` does not supervise the `Caretaker`")]
    UserNotSupervisor(#[error(not(source))] user::Id),
}
