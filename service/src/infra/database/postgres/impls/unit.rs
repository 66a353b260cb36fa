//! [`Unit`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{property, unit, Unit},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of the `units` table, in the order [`from_row()`] expects.
const COLUMNS: &str = "\
    id, property_id, number, \
    monthly_rent, monthly_rent_currency, \
    status, created_at";

/// Builds a [`Unit`] out of the provided [`Row`].
fn from_row(row: &Row) -> Unit {
    Unit {
        id: row.get("id"),
        property_id: row.get("property_id"),
        number: row.get("number"),
        monthly_rent: Money {
            amount: row.get("monthly_rent"),
            currency: row.get("monthly_rent_currency"),
        },
        status: row.get("status"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Unit>, unit::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Unit>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Unit>, unit::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM units \
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

impl<C> Database<Select<By<Vec<Unit>, Vec<property::Id>>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Unit>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Unit>, Vec<property::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let property_ids = by.into_inner();
        if property_ids.is_empty() {
            return Ok(vec![]);
        }

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM units \
             WHERE property_id = ANY($1::UUID[]) \
             ORDER BY property_id, number",
        );
        Ok(self
            .query(&sql, &[&property_ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Unit>, property::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Vec<Unit>, Vec<property::Id>>>,
        Ok = Vec<Unit>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Unit>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Unit>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Select(By::new(vec![by.into_inner()])))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Insert<Unit>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Unit>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(unit): Insert<Unit>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(unit)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Unit>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(unit): Update<Unit>,
    ) -> Result<Self::Ok, Self::Err> {
        let Unit {
            id,
            property_id,
            number,
            monthly_rent,
            status,
            created_at,
        } = unit;

        const SQL: &str = "\
            INSERT INTO units (\
                id, property_id, number, \
                monthly_rent, monthly_rent_currency, \
                status, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, \
                $4::NUMERIC, $5::INT2, \
                $6::INT2, $7::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET number = EXCLUDED.number, \
                monthly_rent = EXCLUDED.monthly_rent, \
                monthly_rent_currency = EXCLUDED.monthly_rent_currency, \
                status = EXCLUDED.status";
        self.exec(
            SQL,
            &[
                &id,
                &property_id,
                &number,
                &monthly_rent.amount,
                &monthly_rent.currency,
                &status,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Unit, unit::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Unit, unit::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: unit::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM units \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
