//! [`Command`] for creating a new technician [`Category`].

use common::operations::{By, Insert, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        technician::{category, Category},
        user, User,
    },
    infra::{database, Database},
    Service,
};

use super::{privilege, Command};

/// [`Command`] for creating a new technician [`Category`] by a super-admin.
#[derive(Clone, Debug)]
pub struct CreateTechnicianCategory {
    /// Unique [`category::Name`] of a new [`Category`].
    pub name: category::Name,

    /// [`category::Description`] of a new [`Category`].
    pub description: Option<category::Description>,

    /// ID of the [`User`] creating the [`Category`].
    pub initiator_id: user::Id,
}

impl<Db> Command<CreateTechnicianCategory> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + for<'n> Database<
            Select<By<Option<Category>, &'n category::Name>>,
            Ok = Option<Category>,
            Err = Traced<database::Error>,
        > + Database<Insert<Category>, Err = Traced<database::Error>>,
{
    type Ok = Category;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateTechnicianCategory,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateTechnicianCategory {
            name,
            description,
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

        let existing = self
            .database()
            .execute(Select(By::<Option<Category>, _>::new(&name)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::NameOccupied(name)));
        }

        let category = Category {
            id: category::Id::new(),
            name,
            description,
            is_active: true,
        };
        self.database()
            .execute(Insert(category.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(category)
    }
}

/// Error of [`CreateTechnicianCategory`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`category::Name`] is used by another [`Category`].
    #[display("`Category` name `{_0}` is occupied")]
    NameOccupied(#[error(not(source))] category::Name),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),

    /// [`User`] is not a super-admin.
    #[display("`User(id: {_0})` is not a super-admin")]
    UserNotSuperAdmin(#[error(not(source))] user::Id),
}
