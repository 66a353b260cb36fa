//! [`Command`] for assigning a [`Caretaker`] to a [`Property`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
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

/// [`Command`] for assigning a [`Caretaker`] to look after a [`Property`].
///
/// A [`Property`] has a single [`Caretaker`], so the current one is
/// unassigned. The [`Caretaker`] leaves its previous [`Property`], if any.
#[derive(Clone, Copy, Debug)]
pub struct AssignCaretaker {
    /// ID of the [`Caretaker`] to assign.
    pub caretaker_id: caretaker::Id,

    /// ID of the [`Property`] to assign the [`Caretaker`] to.
    pub property_id: property::Id,

    /// ID of the [`User`] performing the assignment.
    pub initiator_id: user::Id,
}

impl<Db> Command<AssignCaretaker> for Service<Db>
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
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<
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
        cmd: AssignCaretaker,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AssignCaretaker {
            caretaker_id,
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
        tx.execute(Lock(By::<Caretaker, _>::new(caretaker_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        _ = tx
            .execute(Select(By::<Option<Property>, _>::new(property_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(Property::is_active)
            .ok_or(E::PropertyNotExists(property_id))
            .map_err(tracerr::wrap!())?;

        let mut caretaker = tx
            .execute(Select(By::<Option<Caretaker>, caretaker::Id>::new(
                caretaker_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CaretakerNotExists(caretaker_id))
            .map_err(tracerr::wrap!())?;
        if !caretaker.is_active() {
            return Err(tracerr::new!(E::CaretakerSuspended(caretaker_id)));
        }
        if caretaker.property_id == Some(property_id) {
            return Err(tracerr::new!(E::AlreadyAssigned(caretaker_id)));
        }

        let current = tx
            .execute(Select(By::<Option<Caretaker>, property::Id>::new(
                property_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(Caretaker { id, .. }) = current {
            tx.execute(Lock(By::<Caretaker, _>::new(id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
            let previous = tx
                .execute(Select(By::<Option<Caretaker>, caretaker::Id>::new(
                    id,
                )))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if let Some(mut previous) =
                previous.filter(|c| c.property_id == Some(property_id))
            {
                previous.unassign();
                tx.execute(Update(previous))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
            }
        }

        caretaker.assign(property_id, DateTime::now());
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

/// Error of [`AssignCaretaker`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Caretaker`] looks after the [`Property`] already.
    #[display("`Caretaker(id: {_0})` is assigned to the `Property` already")]
    AlreadyAssigned(#[error(not(source))] caretaker::Id),

    /// [`Caretaker`] with the provided ID does not exist.
    #[display("`Caretaker(id: {_0})` does not exist")]
    CaretakerNotExists(#[error(not(source))] caretaker::Id),

    /// [`Caretaker`] is suspended.
    #[display("`Caretaker(id: {_0})` is suspended")]
    CaretakerSuspended(#[error(not(source))] caretaker::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Property`] with the provided ID does not exist or is inactive.
    #[display("`Property(id: {_0})` does not exist")]
    PropertyNotExists(#[error(not(source))] property::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] does not manage the [`Property`].
    #[display("`User(id: {_0})` does not manage the `Property`")]
    UserNotManager(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use futures::executor::block_on;

    use crate::{
        domain::user,
        infra::database::memory::{fixture, Memory, Rows},
        Command as _,
    };

    use super::{AssignCaretaker, ExecutionError};

    #[test]
    fn replaces_previous_caretaker() {
        let property = fixture::property();
        let manager = fixture::user(user::Role::PropertyManager);
        let old_user = fixture::user(user::Role::Caretaker);
        let new_user = fixture::user(user::Role::Caretaker);
        let old = fixture::caretaker(&old_user, Some(property.id));
        let new = fixture::caretaker(&new_user, None);
        let (old_id, new_id) = (old.id, new.id);
        let svc = Memory::new(Rows {
            users: vec![manager.clone(), old_user, new_user],
            manager_assignments: vec![fixture::manages(&manager, property.id)],
            properties: vec![property.clone()],
            caretakers: vec![old, new],
            ..Rows::default()
        })
        .into_service();

        let assigned = block_on(svc.execute(AssignCaretaker {
            caretaker_id: new_id,
            property_id: property.id,
            initiator_id: manager.id,
        }))
        .unwrap();

        assert_eq!(assigned.property_id, Some(property.id));
        let rows = svc.database().rows();
        let old = rows.caretakers.iter().find(|c| c.id == old_id).unwrap();
        assert_eq!(old.property_id, None);
        assert!(old.assigned_at.is_none());
        let new = rows.caretakers.iter().find(|c| c.id == new_id).unwrap();
        assert_eq!(new.property_id, Some(property.id));
    }

    #[test]
    fn rejects_reassigning_same_caretaker() {
        let property = fixture::property();
        let admin = fixture::user(user::Role::SuperAdmin);
        let helper = fixture::user(user::Role::Caretaker);
        let caretaker = fixture::caretaker(&helper, Some(property.id));
        let id = caretaker.id;
        let svc = Memory::new(Rows {
            users: vec![admin.clone(), helper],
            properties: vec![property.clone()],
            caretakers: vec![caretaker],
            ..Rows::default()
        })
        .into_service();

        let err = block_on(svc.execute(AssignCaretaker {
            caretaker_id: id,
            property_id: property.id,
            initiator_id: admin.id,
        }))
        .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::AlreadyAssigned(c) if c == id,
        ));
    }

    #[test]
    fn rejects_manager_of_other_property() {
        let property = fixture::property();
        let manager = fixture::user(user::Role::PropertyManager);
        let helper = fixture::user(user::Role::Caretaker);
        let caretaker = fixture::caretaker(&helper, None);
        let id = caretaker.id;
        let svc = Memory::new(Rows {
            users: vec![manager.clone(), helper],
            manager_assignments: vec![fixture::manages(
                &manager,
                fixture::property().id,
            )],
            properties: vec![property.clone()],
            caretakers: vec![caretaker],
            ..Rows::default()
        })
        .into_service();

        let err = block_on(svc.execute(AssignCaretaker {
            caretaker_id: id,
            property_id: property.id,
            initiator_id: manager.id,
        }))
        .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::UserNotManager(u) if u == manager.id,
        ));
        assert_eq!(svc.database().rows().caretakers[0].property_id, None);
    }
}
