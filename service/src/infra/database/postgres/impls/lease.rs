//! [`Lease`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{lease, property, tenant, unit, Lease},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::Active,
};

/// Columns of the `leases` table, in the order [`from_row()`] expects.
const COLUMNS: &str = "\
    id, tenant_id, property_id, unit_id, \
    monthly_rent, monthly_rent_currency, status, \
    starts_at, ends_at, created_at, terminated_at";

/// Builds a [`Lease`] out of the provided [`Row`].
fn from_row(row: &Row) -> Lease {
    Lease {
        id: row.get("id"),
        tenant_id: row.get("tenant_id"),
        property_id: row.get("property_id"),
        unit_id: row.get("unit_id"),
        monthly_rent: Money {
            amount: row.get("monthly_rent"),
            currency: row.get("monthly_rent_currency"),
        },
        status: row.get("status"),
        starts_at: row.get("starts_at"),
        ends_at: row.get("ends_at"),
        created_at: row.get("created_at"),
        terminated_at: row.get("terminated_at"),
    }
}

impl<C> Database<Select<By<Option<Lease>, lease::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Lease>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Lease>, lease::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM leases \
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

impl<C> Database<Select<By<Option<Active<Lease>>, unit::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Active<Lease>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Active<Lease>>, unit::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let unit_id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM leases \
             WHERE unit_id = $1::UUID \
               AND status = $2::INT2 \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&unit_id, &lease::Status::Active])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row)
            .map(Active))
    }
}

impl<C> Database<Select<By<Vec<Lease>, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Lease>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Lease>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let property_id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM leases \
             WHERE property_id = $1::UUID \
             ORDER BY created_at DESC",
        );
        Ok(self
            .query(&sql, &[&property_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Lease>, tenant::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Lease>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Lease>, tenant::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let tenant_id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM leases \
             WHERE tenant_id = $1::UUID \
             ORDER BY created_at DESC",
        );
        Ok(self
            .query(&sql, &[&tenant_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Lease>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Lease>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(lease): Insert<Lease>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(lease)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Lease>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(lease): Update<Lease>,
    ) -> Result<Self::Ok, Self::Err> {
        let Lease {
            id,
            tenant_id,
            property_id,
            unit_id,
            monthly_rent,
            status,
            starts_at,
            ends_at,
            created_at,
            terminated_at,
        } = lease;

        const SQL: &str = "\
            INSERT INTO leases (\
                id, tenant_id, property_id, unit_id, \
                monthly_rent, monthly_rent_currency, status, \
                starts_at, ends_at, created_at, terminated_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::UUID, \
                $5::NUMERIC, $6::INT2, $7::INT2, \
                $8::TIMESTAMPTZ, $9::TIMESTAMPTZ, \
                $10::TIMESTAMPTZ, $11::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET monthly_rent = EXCLUDED.monthly_rent, \
                monthly_rent_currency = EXCLUDED.monthly_rent_currency, \
                status = EXCLUDED.status, \
                starts_at = EXCLUDED.starts_at, \
                ends_at = EXCLUDED.ends_at, \
                terminated_at = EXCLUDED.terminated_at";
        self.exec(
            SQL,
            &[
                &id,
                &tenant_id,
                &property_id,
                &unit_id,
                &monthly_rent.amount,
                &monthly_rent.currency,
                &status,
                &starts_at,
                &ends_at,
                &created_at,
                &terminated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Lease, lease::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Lease, lease::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: lease::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM leases \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
