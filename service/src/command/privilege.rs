//! Checks of [`Command`] initiators' privileges.
//!
//! [`Command`]: super::Command

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{manager, property, user, Caretaker, User},
    infra::{database, Database},
    read::Active,
};
#[cfg(doc)]
use crate::domain::Property;

/// Selects the [`User`] initiating a [`Command`], if it exists and is
/// active.
///
/// [`Command`]: super::Command
pub(crate) async fn initiator<Db>(
    db: &Db,
    id: user::Id,
) -> Result<Option<User>, Traced<database::Error>>
where
    Db: Database<
        Select<By<Option<User>, user::Id>>,
        Ok = Option<User>,
        Err = Traced<database::Error>,
    >,
{
    Ok(db
        .execute(Select(By::<Option<User>, _>::new(id)))
        .await
        .map_err(tracerr::wrap!())?
        .filter(User::is_active))
}

/// Indicates whether the provided [`User`] is allowed to manage the
/// [`Property`]: either a super-admin or its active property manager.
pub(crate) async fn manages<Db>(
    db: &Db,
    user: &User,
    property_id: property::Id,
) -> Result<bool, Traced<database::Error>>
where
    Db: Database<
        Select<By<Option<Active<manager::Assignment>>, property::Id>>,
        Ok = Option<Active<manager::Assignment>>,
        Err = Traced<database::Error>,
    >,
{
    if user.is_super_admin() {
        return Ok(true);
    }
    if !user.acts_as(user::Role::PropertyManager) {
        return Ok(false);
    }
    Ok(db
        .execute(Select(By::<Option<Active<manager::Assignment>>, _>::new(
            property_id,
        )))
        .await
        .map_err(tracerr::wrap!())?
        .is_some_and(|Active(a)| a.manager_id == user.id))
}

/// Indicates whether the provided [`User`] is allowed to supervise the
/// [`Caretaker`]: either its manager or the one of its [`Property`].
pub(crate) async fn supervises<Db>(
    db: &Db,
    user: &User,
    caretaker: &Caretaker,
) -> Result<bool, Traced<database::Error>>
where
    Db: Database<
        Select<By<Option<Active<manager::Assignment>>, property::Id>>,
        Ok = Option<Active<manager::Assignment>>,
        Err = Traced<database::Error>,
    >,
{
    if user.acts_as(user::Role::PropertyManager)
        && caretaker.manager_id == Some(user.id)
    {
        return Ok(true);
    }
    match caretaker.property_id {
        Some(id) => manages(db, user, id).await,
        None => Ok(user.is_super_admin()),
    }
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Select},
        DateTime,
    };
    use futures::executor::block_on;
    use tracerr::Traced;

    use crate::{
        domain::{caretaker, manager, property, user, Caretaker, User},
        infra::{database, Database},
        read::Active,
    };

    /// In-memory [`Database`] holding [`User`]s and manager assignments.
    #[derive(Default)]
    struct Memory {
        users: Vec<User>,
        assignments: Vec<manager::Assignment>,
    }

    impl Database<Select<By<Option<User>, user::Id>>> for Memory {
        type Ok = Option<User>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<Option<User>, user::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            let id = by.into_inner();
            Ok(self.users.iter().find(|u| u.id == id).cloned())
        }
    }

    impl Database<Select<By<Option<Active<manager::Assignment>>, property::Id>>>
        for Memory
    {
        type Ok = Option<Active<manager::Assignment>>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<
                By<Option<Active<manager::Assignment>>, property::Id>,
            >,
        ) -> Result<Self::Ok, Self::Err> {
            let id = by.into_inner();
            Ok(self
                .assignments
                .iter()
                .find(|a| a.property_id == id && a.is_active())
                .cloned()
                .map(Active))
        }
    }

    fn user(role: user::Role, status: user::Status) -> User {
        let password = user::Password::new("correct-horse").unwrap();
        User {
            id: user::Id::new(),
            name: user::Name::new("Jane Doe").unwrap(),
            email: user::Email::new("jane@example.com").unwrap(),
            phone: None,
            role,
            status,
            password_hash: user::PasswordHash::new(&password).unwrap(),
            created_at: DateTime::now().coerce(),
        }
    }

    fn assignment(
        manager_id: user::Id,
        property_id: property::Id,
        status: manager::Status,
    ) -> manager::Assignment {
        manager::Assignment {
            id: manager::Id::new(),
            manager_id,
            property_id,
            status,
            assigned_at: DateTime::now().coerce(),
        }
    }

    fn caretaker(
        property_id: Option<property::Id>,
        manager_id: Option<user::Id>,
    ) -> Caretaker {
        Caretaker {
            id: caretaker::Id::new(),
            user_id: user::Id::new(),
            property_id,
            manager_id,
            status: caretaker::Status::Active,
            performance_rating: None,
            hired_at: DateTime::now().coerce(),
            assigned_at: None,
        }
    }

    #[test]
    fn initiator_must_be_active() {
        let active = user(user::Role::Tenant, user::Status::Active);
        let pending = user(user::Role::Tenant, user::Status::Pending);
        let suspended = user(user::Role::Tenant, user::Status::Suspended);
        let db = Memory {
            users: vec![active.clone(), pending.clone(), suspended.clone()],
            ..Memory::default()
        };

        let found = block_on(super::initiator(&db, active.id)).unwrap();
        assert_eq!(found.map(|u| u.id), Some(active.id));
        assert!(block_on(super::initiator(&db, pending.id))
            .unwrap()
            .is_none());
        assert!(block_on(super::initiator(&db, suspended.id))
            .unwrap()
            .is_none());
        assert!(block_on(super::initiator(&db, user::Id::new()))
            .unwrap()
            .is_none());
    }

    #[test]
    fn super_admin_manages_everything() {
        let admin = user(user::Role::SuperAdmin, user::Status::Active);
        let db = Memory::default();

        assert!(block_on(super::manages(&db, &admin, property::Id::new()))
            .unwrap());
    }

    #[test]
    fn manager_manages_only_assigned_properties() {
        let manager = user(user::Role::PropertyManager, user::Status::Active);
        let other = user(user::Role::PropertyManager, user::Status::Active);
        let (managed, transferred, foreign) =
            (property::Id::new(), property::Id::new(), property::Id::new());
        let db = Memory {
            assignments: vec![
                assignment(manager.id, managed, manager::Status::Active),
                assignment(
                    manager.id,
                    transferred,
                    manager::Status::Transferred,
                ),
                assignment(other.id, transferred, manager::Status::Active),
                assignment(other.id, foreign, manager::Status::Active),
            ],
            ..Memory::default()
        };

        assert!(block_on(super::manages(&db, &manager, managed)).unwrap());
        assert!(!block_on(super::manages(&db, &manager, transferred)).unwrap());
        assert!(!block_on(super::manages(&db, &manager, foreign)).unwrap());
    }

    #[test]
    fn other_roles_manage_nothing() {
        let tenant = user(user::Role::Tenant, user::Status::Active);
        let suspended =
            user(user::Role::PropertyManager, user::Status::Suspended);
        let property_id = property::Id::new();
        let db = Memory {
            assignments: vec![
                assignment(tenant.id, property_id, manager::Status::Active),
                assignment(suspended.id, property_id, manager::Status::Active),
            ],
            ..Memory::default()
        };

        assert!(!block_on(super::manages(&db, &tenant, property_id)).unwrap());
        assert!(
            !block_on(super::manages(&db, &suspended, property_id)).unwrap()
        );
    }

    #[test]
    fn caretaker_supervision() {
        let admin = user(user::Role::SuperAdmin, user::Status::Active);
        let manager = user(user::Role::PropertyManager, user::Status::Active);
        let stranger = user(user::Role::PropertyManager, user::Status::Active);
        let property_id = property::Id::new();
        let db = Memory {
            assignments: vec![assignment(
                manager.id,
                property_id,
                manager::Status::Active,
            )],
            ..Memory::default()
        };

        let hired = caretaker(None, Some(stranger.id));
        assert!(block_on(super::supervises(&db, &stranger, &hired)).unwrap());
        assert!(!block_on(super::supervises(&db, &manager, &hired)).unwrap());
        assert!(block_on(super::supervises(&db, &admin, &hired)).unwrap());

        let assigned = caretaker(Some(property_id), None);
        assert!(block_on(super::supervises(&db, &manager, &assigned)).unwrap());
        assert!(
            !block_on(super::supervises(&db, &stranger, &assigned)).unwrap()
        );
        assert!(block_on(super::supervises(&db, &admin, &assigned)).unwrap());
    }
}
