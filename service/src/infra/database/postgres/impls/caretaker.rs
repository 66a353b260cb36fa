//! [`Caretaker`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{caretaker, property, user, Caretaker},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of the `caretakers` table, in the order [`from_row()`] expects.
const COLUMNS: &str = "\
    id, user_id, property_id, manager_id, status, \
    performance_rating, hired_at, assigned_at";

/// Builds a [`Caretaker`] out of the provided [`Row`].
fn from_row(row: &Row) -> Caretaker {
    Caretaker {
        id: row.get("id"),
        user_id: row.get("user_id"),
        property_id: row.get("property_id"),
        manager_id: row.get("manager_id"),
        status: row.get("status"),
        performance_rating: row.get("performance_rating"),
        hired_at: row.get("hired_at"),
        assigned_at: row.get("assigned_at"),
    }
}

impl<C> Database<Select<By<Option<Caretaker>, caretaker::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Caretaker>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Caretaker>, caretaker::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM caretakers \
             WHERE id = $1::UUID",
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Option<Caretaker>, user::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Caretaker>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Caretaker>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user_id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM caretakers \
             WHERE user_id = $1::UUID",
        );
        Ok(self
            .query_opt(&sql, &[&user_id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Option<Caretaker>, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Caretaker>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Caretaker>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let property_id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM caretakers \
             WHERE property_id = $1::UUID",
        );
        Ok(self
            .query_opt(&sql, &[&property_id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

/// Selects [`Caretaker`]s supervised by the manager [`User`].
///
/// [`User`]: crate::domain::User
impl<C> Database<Select<By<Vec<Caretaker>, user::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Caretaker>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Caretaker>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let manager_id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM caretakers \
             WHERE manager_id = $1::UUID \
             ORDER BY hired_at ASC",
        );
        Ok(self
            .query(&sql, &[&manager_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Caretaker>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Caretaker>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(caretaker): Insert<Caretaker>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(caretaker))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Caretaker>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(caretaker): Update<Caretaker>,
    ) -> Result<Self::Ok, Self::Err> {
        let Caretaker {
            id,
            user_id,
            property_id,
            manager_id,
            status,
            performance_rating,
            hired_at,
            assigned_at,
        } = caretaker;

        const SQL: &str = "\
            INSERT INTO caretakers (\
                id, user_id, property_id, manager_id, status, \
                performance_rating, hired_at, assigned_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::UUID, $5::INT2, \
                $6::NUMERIC, $7::TIMESTAMPTZ, $8::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET property_id = EXCLUDED.property_id, \
                manager_id = EXCLUDED.manager_id, \
                status = EXCLUDED.status, \
                performance_rating = EXCLUDED.performance_rating, \
                assigned_at = EXCLUDED.assigned_at";
        self.exec(
            SQL,
            &[
                &id,
                &user_id,
                &property_id,
                &manager_id,
                &status,
                &performance_rating,
                &hired_at,
                &assigned_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Caretaker, caretaker::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Caretaker, caretaker::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: caretaker::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM caretakers \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
