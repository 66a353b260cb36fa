//! [`Command`] for creating a new [`Property`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::property::{Address, Description, Kind, Name};
use crate::{
    domain::{property, user, Property, User},
    infra::{database, Database},
    Service,
};

use super::{privilege, Command};

/// [`Command`] for creating a new [`Property`] by a super-admin.
#[derive(Clone, Debug)]
pub struct CreateProperty {
    /// [`Name`] of a new [`Property`].
    pub name: property::Name,

    /// [`Address`] of a new [`Property`].
    pub address: property::Address,

    /// [`Description`] of a new [`Property`].
    pub description: Option<property::Description>,

    /// [`Kind`] of a new [`Property`].
    pub kind: property::Kind,

    /// ID of the [`User`] creating the [`Property`].
    pub initiator_id: user::Id,
}

impl<Db> Command<CreateProperty> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Property>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Property;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateProperty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateProperty {
            name,
            address,
            description,
            kind,
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

        let property = Property {
            id: property::Id::new(),
            name,
            address,
            description,
            kind,
            status: property::Status::Active,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(property.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(property)
    }
}

/// Error of [`CreateProperty`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] is not a super-admin.
    #[display("`User(id: {_0})` is not a super-admin")]
    UserNotSuperAdmin(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use std::{cell::RefCell, rc::Rc, time::Duration};

    use common::{
        operations::{By, Commit, Insert, Select, Transact},
        DateTime,
    };
    use futures::executor::block_on;
    use tracerr::Traced;

    use crate::{
        domain::{property, user, Property, User},
        infra::{database, Database},
        task, Command as _, Config, Service,
    };

    use super::{CreateProperty, ExecutionError};

    /// In-memory [`Database`] holding [`User`]s and inserted [`Property`]s.
    #[derive(Clone, Default)]
    struct Memory {
        users: Vec<User>,
        properties: Rc<RefCell<Vec<Property>>>,
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

    impl Database<Transact> for Memory {
        type Ok = Self;
        type Err = Traced<database::Error>;

        async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
            Ok(self.clone())
        }
    }

    impl Database<Insert<Property>> for Memory {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Insert(property): Insert<Property>,
        ) -> Result<Self::Ok, Self::Err> {
            self.properties.borrow_mut().push(property);
            Ok(())
        }
    }

    impl Database<Commit> for Memory {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
            Ok(())
        }
    }

    fn service(users: Vec<User>) -> Service<Memory> {
        let day = Duration::from_secs(24 * 60 * 60);
        Service {
            config: Config {
                jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(
                    b"secret",
                ),
                jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(
                    b"secret",
                ),
                session_expiration: day,
                maintenance_response_time: day,
                mark_overdue: task::mark_overdue::Config {
                    interval: Duration::from_secs(60 * 60),
                },
            },
            database: Memory {
                users,
                ..Memory::default()
            },
        }
    }

    fn user(role: user::Role) -> User {
        let password = user::Password::new("correct-horse").unwrap();
        User {
            id: user::Id::new(),
            name: user::Name::new("Jane Doe").unwrap(),
            email: user::Email::new("jane@example.com").unwrap(),
            phone: None,
            role,
            status: user::Status::Active,
            password_hash: user::PasswordHash::new(&password).unwrap(),
            created_at: DateTime::now().coerce(),
        }
    }

    fn command(initiator_id: user::Id) -> CreateProperty {
        CreateProperty {
            name: property::Name::new("Sunrise Court").unwrap(),
            address: property::Address::new("12 Ngong Road, Nairobi")
                .unwrap(),
            description: None,
            kind: property::Kind::Apartment,
            initiator_id,
        }
    }

    #[test]
    fn super_admin_creates_active_property() {
        let admin = user(user::Role::SuperAdmin);
        let svc = service(vec![admin.clone()]);

        let created = block_on(svc.execute(command(admin.id))).unwrap();

        assert_eq!(created.status, property::Status::Active);
        let stored = svc.database().properties.borrow();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, created.id);
    }

    #[test]
    fn rejects_non_super_admin() {
        let manager = user(user::Role::PropertyManager);
        let svc = service(vec![manager.clone()]);

        let err = block_on(svc.execute(command(manager.id))).unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::UserNotSuperAdmin(id) if id == manager.id,
        ));
        assert!(svc.database().properties.borrow().is_empty());
    }

    #[test]
    fn rejects_unknown_initiator() {
        let svc = service(vec![]);
        let ghost = user::Id::new();

        let err = block_on(svc.execute(command(ghost))).unwrap_err();

        assert!(matches!(
            err.into_inner(),
            ExecutionError::UserNotExists(id) if id == ghost,
        ));
    }
}
