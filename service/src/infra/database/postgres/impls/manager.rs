//! [`manager::Assignment`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{manager, property, user},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::Active,
};

/// Columns of the `manager_assignments` table, in the order [`from_row()`]
/// expects.
const COLUMNS: &str = "id, manager_id, property_id, status, assigned_at";

/// Builds a [`manager::Assignment`] out of the provided [`Row`].
fn from_row(row: &Row) -> manager::Assignment {
    manager::Assignment {
        id: row.get("id"),
        manager_id: row.get("manager_id"),
        property_id: row.get("property_id"),
        status: row.get("status"),
        assigned_at: row.get("assigned_at"),
    }
}

impl<C> Database<Select<By<Option<Active<manager::Assignment>>, property::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Active<manager::Assignment>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Option<Active<manager::Assignment>>, property::Id>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let property_id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM manager_assignments \
             WHERE property_id = $1::UUID \
               AND status = $2::INT2 \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&property_id, &manager::Status::Active])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row)
            .map(Active))
    }
}

impl<C> Database<Select<By<Vec<manager::Assignment>, user::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<manager::Assignment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<manager::Assignment>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let manager_id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM manager_assignments \
             WHERE manager_id = $1::UUID \
               AND status = $2::INT2 \
             ORDER BY assigned_at DESC",
        );
        Ok(self
            .query(&sql, &[&manager_id, &manager::Status::Active])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<manager::Assignment>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Update<manager::Assignment>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(assignment): Insert<manager::Assignment>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(assignment))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<manager::Assignment>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(assignment): Update<manager::Assignment>,
    ) -> Result<Self::Ok, Self::Err> {
        let manager::Assignment {
            id,
            manager_id,
            property_id,
            status,
            assigned_at,
        } = assignment;

        const SQL: &str = "\
            INSERT INTO manager_assignments (\
                id, manager_id, property_id, status, assigned_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::INT2, $5::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET status = EXCLUDED.status";
        self.exec(
            SQL,
            &[&id, &manager_id, &property_id, &status, &assigned_at],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
