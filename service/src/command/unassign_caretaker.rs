//! [`Command`] for unassigning the [`Caretaker`] of a [`Property`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{caretaker, manager, property, user, Caretaker, Property, User},
    infra::{database, Database},
    read::Active,
    Service,
};

use super::{privilege, Command};

/// [`Command`] for freeing a [`Property`] from its [`Caretaker`].
#[derive(Clone, Copy, Debug)]
pub struct UnassignCaretaker {
    /// ID of the [`Property`] to unassign the [`Caretaker`] from.
    pub property_id: property::Id,

    /// ID of the [`User`] performing the unassignment.
    pub initiator_id: user::Id,
}

impl<Db> Command<UnassignCaretaker> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
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
            Select<By<Option<Caretaker>, property::Id>>,
            Ok = Option<Caretaker>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Property, property::Id>>,
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
        cmd: UnassignCaretaker,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UnassignCaretaker {
            property_id,
            initiator_id,
        } = cmd;

        let initiator = privilege::initiator(self.database(), initiator_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;
        if !privilege::manages(self.database(), &initiator, property_id)
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

        // Avoid concurrent caretaker assignments upon the same `Property`.
        tx.execute(Lock(By::<Property, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let Caretaker { id, .. } = tx
            .execute(Select(By::<Option<Caretaker>, property::Id>::new(
                property_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotAssigned(property_id))
            .map_err(tracerr::wrap!())?;
        tx.execute(Lock(By::<Caretaker, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        let mut caretaker = tx
            .execute(Select(By::<Option<Caretaker>, caretaker::Id>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|c| c.property_id == Some(property_id))
            .ok_or(E::NotAssigned(property_id))
            .map_err(tracerr::wrap!())?;

        caretaker.unassign();
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

/// Error of [`UnassignCaretaker`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Property`] has no [`Caretaker`].
    #[display("`Property(id: {_0})` has no caretaker")]
    NotAssigned(#[error(not(source))] property::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] does not manage the [`Property`].
    #[display("`User(id: {_0})` does not manage the `Property`")]
    UserNotManager(#[error(not(source))] user::Id),
}
