//! [`Command`] for updating a technician [`Category`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
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

/// [`Command`] for updating a technician [`Category`] by a super-admin.
///
/// Deactivated [`Category`] is hidden from the categories list.
#[derive(Clone, Debug)]
pub struct UpdateTechnicianCategory {
    /// ID of the [`Category`] to update.
    pub category_id: category::Id,

    /// New [`category::Name`].
    pub name: Option<category::Name>,

    /// New [`category::Description`].
    ///
    /// `Some(None)` removes the description.
    pub description: Option<Option<category::Description>>,

    /// New activity flag of the [`Category`].
    pub is_active: Option<bool>,

    /// ID of the [`User`] updating the [`Category`].
    pub initiator_id: user::Id,
}

impl<Db> Command<UpdateTechnicianCategory> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Category>, category::Id>>,
            Ok = Option<Category>,
            Err = Traced<database::Error>,
        > + for<'n> Database<
            Select<By<Option<Category>, &'n category::Name>>,
            Ok = Option<Category>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Category, category::Id>>,
            Err = Traced<database::Error>,
        > + Database<Update<Category>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Category;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateTechnicianCategory,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateTechnicianCategory {
            category_id,
            name,
            description,
            is_active,
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

        // Avoid concurrent actions upon the same `Category`.
        tx.execute(Lock(By::new(category_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut category = tx
            .execute(Select(By::<Option<Category>, _>::new(category_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CategoryNotExists(category_id))
            .map_err(tracerr::wrap!())?;

        if let Some(name) = name.filter(|n| *n != category.name) {
            let occupied = tx
                .execute(Select(By::<Option<Category>, _>::new(&name)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .is_some();
            if occupied {
                return Err(tracerr::new!(E::NameOccupied(name)));
            }
            category.name = name;
        }
        if let Some(description) = description {
            category.description = description;
        }
        if let Some(is_active) = is_active {
            category.is_active = is_active;
        }

        tx.execute(Update(category.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(category)
    }
}

/// Error of [`UpdateTechnicianCategory`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Category`] with the provided ID does not exist.
    #[display("`Category(id: {_0})` does not exist")]
    CategoryNotExists(#[error(not(source))] category::Id),

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
