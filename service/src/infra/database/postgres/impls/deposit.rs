//! [`Deposit`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{deposit, property, Deposit},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of the `security_deposits` table, in the order [`from_row()`]
/// expects.
const COLUMNS: &str = "\
    id, tenant_id, lease_id, property_id, unit_id, \
    amount, amount_currency, status, \
    refund_amount, refund_amount_currency, refund_reason, \
    created_at, released_at";

/// Builds a [`Deposit`] out of the provided [`Row`].
fn from_row(row: &Row) -> Deposit {
    Deposit {
        id: row.get("id"),
        tenant_id: row.get("tenant_id"),
        lease_id: row.get("lease_id"),
        property_id: row.get("property_id"),
        unit_id: row.get("unit_id"),
        amount: Money {
            amount: row.get("amount"),
            currency: row.get("amount_currency"),
        },
        status: row.get("status"),
        refund_amount: row.get::<_, Option<_>>("refund_amount").map(
            |amount| Money {
                amount,
                currency: row.get("refund_amount_currency"),
            },
        ),
        refund_reason: row.get("refund_reason"),
        created_at: row.get("created_at"),
        released_at: row.get("released_at"),
    }
}

impl<C> Database<Select<By<Option<Deposit>, deposit::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Deposit>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Deposit>, deposit::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM security_deposits \
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

impl<C> Database<Select<By<Vec<Deposit>, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Deposit>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Deposit>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let property_id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM security_deposits \
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

impl<C> Database<Insert<Deposit>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Deposit>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(deposit): Insert<Deposit>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(deposit))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Deposit>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(deposit): Update<Deposit>,
    ) -> Result<Self::Ok, Self::Err> {
        let Deposit {
            id,
            tenant_id,
            lease_id,
            property_id,
            unit_id,
            amount,
            status,
            refund_amount,
            refund_reason,
            created_at,
            released_at,
        } = deposit;
        let (refund, refund_currency) =
            refund_amount.map(|m| (m.amount, m.currency)).unzip();

        const SQL: &str = "\
            INSERT INTO security_deposits (\
                id, tenant_id, lease_id, property_id, unit_id, \
                amount, amount_currency, status, \
                refund_amount, refund_amount_currency, refund_reason, \
                created_at, released_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::UUID, $5::UUID, \
                $6::NUMERIC, $7::INT2, $8::INT2, \
                $9::NUMERIC, $10::INT2, $11::TEXT, \
                $12::TIMESTAMPTZ, $13::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET status = EXCLUDED.status, \
                refund_amount = EXCLUDED.refund_amount, \
                refund_amount_currency = EXCLUDED.refund_amount_currency, \
                refund_reason = EXCLUDED.refund_reason, \
                released_at = EXCLUDED.released_at";
        self.exec(
            SQL,
            &[
                &id,
                &tenant_id,
                &lease_id,
                &property_id,
                &unit_id,
                &amount.amount,
                &amount.currency,
                &status,
                &refund,
                &refund_currency,
                &refund_reason,
                &created_at,
                &released_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Deposit, deposit::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Deposit, deposit::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: deposit::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM security_deposits \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
