//! [`Command`] for assigning a property manager to a [`Property`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{manager, property, user, Property, User},
    infra::{database, Database},
    read::Active,
    Service,
};

use super::{privilege, Command};

/// [`Command`] for assigning a property manager to a [`Property`].
///
/// A [`Property`] has at most one active manager, so the previous active
/// [`manager::Assignment`] is marked as [`manager::Status::Transferred`].
#[derive(Clone, Copy, Debug)]
pub struct AssignPropertyManager {
    /// ID of the [`Property`] to assign the manager to.
    pub property_id: property::Id,

    /// ID of the [`User`] to become the manager.
    pub manager_id: user::Id,

    /// ID of the super-admin [`User`] performing the assignment.
    pub initiator_id: user::Id,
}

impl<Db> Command<AssignPropertyManager> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Active<manager::Assignment>>, property::Id>>,
            Ok = Option<Active<manager::Assignment>>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Property, property::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Insert<manager::Assignment>,
            Err = Traced<database::Error>,
        > + Database<
            Update<manager::Assignment>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = manager::Assignment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AssignPropertyManager,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AssignPropertyManager {
            property_id,
            manager_id,
            initiator_id,
        } = cmd;

        let initiator = privilege::initiator(self.database(), initiator_id)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(initiator_id))
            .map_err(tracerr::wrap!())?;
        if !initiator.is_super_admin() {
            return Err(tracerr::new!(E::UserNotSuperAdmin(initiator_id)));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent assignments upon the same `Property`.
        tx.execute(Lock(By::new(property_id)))
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

        let manager = tx
            .execute(Select(By::<Option<User>, _>::new(manager_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(manager_id))
            .map_err(tracerr::wrap!())?;
        if !manager.acts_as(user::Role::PropertyManager) {
            return Err(tracerr::new!(E::UserNotPropertyManager(manager_id)));
        }

        let current = tx
            .execute(Select(
                By::<Option<Active<manager::Assignment>>, _>::new(property_id),
            ))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(Active(mut previous)) = current {
            if previous.manager_id == manager_id {
                return Err(tracerr::new!(E::AlreadyAssigned(manager_id)));
            }
            previous.status = manager::Status::Transferred;
            tx.execute(Update(previous))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        let assignment = manager::Assignment {
            id: manager::Id::new(),
            manager_id,
            property_id,
            status: manager::Status::Active,
            assigned_at: DateTime::now().coerce(),
        };
        tx.execute(Insert(assignment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(assignment)
    }
}

/// Error of [`AssignPropertyManager`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`User`] already manages the [`Property`].
    #[display("`User(id: {_0})` already manages the `Property`")]
    AlreadyAssigned(#[error(not(source))] user::Id),

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

    /// [`User`] is not an active property manager.
    #[display("`User(id: {_0})` is not a property manager")]
    UserNotPropertyManager(#[error(not(source))] user::Id),

    /// [`User`] is not a super-admin.
    #[display("`User(id: {_0})` is not a super-admin")]
    UserNotSuperAdmin(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use futures::executor::block_on;

    use crate::{
        domain::{manager, user},
        infra::database::memory::{fixture, Memory, Rows},
        Command as _,
    };

    use super::{AssignPropertyManager, ExecutionError};

    #[test]
    fn transfers_property_to_new_manager() {
        let property = fixture::property();
        let admin = fixture::user(user::Role::SuperAdmin);
        let previous = fixture::user(user::Role::PropertyManager);
        let next = fixture::user(user::Role::PropertyManager);
        let old = fixture::manages(&previous, property.id);
        let old_id = old.id;
        let svc = Memory::new(Rows {
            users: vec![admin.clone(), previous, next.clone()],
            properties: vec![property.clone()],
            manager_assignments: vec![old],
            ..Rows::default()
        })
        .into_service();

        let assignment = block_on(svc.execute(AssignPropertyManager {
            property_id: property.id,
            manager_id: next.id,
            initiator_id: admin.id,
        }))
        .unwrap();

        assert_eq!(assignment.manager_id, next.id);
        assert_eq!(assignment.status, manager::Status::Active);
        let rows = svc.database().rows();
        assert_eq!(rows.manager_assignments.len(), 2);
        let old = rows
            .manager_assignments
            .iter()
            .find(|a| a.id == old_id)
            .unwrap();
        assert_eq!(old.status, manager::Status::Transferred);
    }

    #[test]
    fn rejects_current_manager() {
        let property = fixture::property();
        let admin = fixture::user(user::Role::SuperAdmin);
        let current = fixture::user(user::Role::PropertyManager);
        let svc = Memory::new(Rows {
            users: vec![admin.clone(), current.clone()],
            properties: vec![property.clone()],
            manager_assignments: vec![fixture::manages(&current, property.id)],
            ..Rows::default()
        })
        .into_service();

        let err = block_on(svc.execute(AssignPropertyManager {
            property_id: property.id,
            manager_id: current.id,
            initiator_id: admin.id,
        }))
        .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::AlreadyAssigned(id) if id == current.id,
        ));
        let rows = svc.database().rows();
        assert_eq!(rows.manager_assignments.len(), 1);
        assert_eq!(rows.manager_assignments[0].status, manager::Status::Active);
    }

    #[test]
    fn rejects_non_manager_role() {
        let property = fixture::property();
        let admin = fixture::user(user::Role::SuperAdmin);
        let tenant = fixture::user(user::Role::Tenant);
        let svc = Memory::new(Rows {
            users: vec![admin.clone(), tenant.clone()],
            properties: vec![property.clone()],
            ..Rows::default()
        })
        .into_service();

        let err = block_on(svc.execute(AssignPropertyManager {
            property_id: property.id,
            manager_id: tenant.id,
            initiator_id: admin.id,
        }))
        .unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::UserNotPropertyManager(id) if id == tenant.id,
        ));
    }
}
