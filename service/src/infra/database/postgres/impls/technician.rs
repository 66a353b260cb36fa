//! [`Technician`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{property, technician, user, Technician},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of the `technicians` table, in the order [`from_row()`] expects.
const COLUMNS: &str = "\
    id, user_id, category_id, is_available, \
    average_rating, ratings_count, total_jobs_completed, \
    status, created_at";

/// Builds a [`Technician`] out of the provided [`Row`].
fn from_row(row: &Row) -> Technician {
    Technician {
        id: row.get("id"),
        user_id: row.get("user_id"),
        category_id: row.get("category_id"),
        is_available: row.get("is_available"),
        average_rating: row.get("average_rating"),
        ratings_count: u32::try_from(row.get::<_, i32>("ratings_count"))
            .unwrap_or_default(),
        total_jobs_completed: u32::try_from(
            row.get::<_, i32>("total_jobs_completed"),
        )
        .unwrap_or_default(),
        status: row.get("status"),
        created_at: row.get("created_at"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<technician::Id, Technician>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[technician::Id]>,
{
    type Ok = HashMap<technician::Id, Technician>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<technician::Id, Technician>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[technician::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap_or(i32::MAX);

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM technicians \
             WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
             LIMIT $2::INT4",
        );
        Ok(self
            .query(&sql, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| {
                let t = from_row(row);
                (t.id, t)
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Technician>, technician::Id>>>
    for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<technician::Id, Technician>, [technician::Id; 1]>>,
        Ok = HashMap<technician::Id, Technician>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Technician>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Technician>, technician::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Option<Technician>, user::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Technician>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Technician>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user_id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM technicians \
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

impl<C> Database<Select<By<Vec<Technician>, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Technician>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Technician>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let property_id = by.into_inner();

        // Ordered to keep ranking ties deterministic.
        let sql = format!(
            "SELECT {COLUMNS} \
             FROM technicians \
             WHERE id IN (\
                 SELECT technician_id \
                 FROM technician_assignments \
                 WHERE property_id = $1::UUID \
                   AND is_active\
             ) \
             ORDER BY created_at ASC",
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

impl<C> Database<Insert<Technician>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Technician>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(technician): Insert<Technician>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(technician))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Technician>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(technician): Update<Technician>,
    ) -> Result<Self::Ok, Self::Err> {
        let Technician {
            id,
            user_id,
            category_id,
            is_available,
            average_rating,
            ratings_count,
            total_jobs_completed,
            status,
            created_at,
        } = technician;
        let ratings_count = i32::try_from(ratings_count).unwrap_or(i32::MAX);
        let total_jobs_completed =
            i32::try_from(total_jobs_completed).unwrap_or(i32::MAX);

        const SQL: &str = "\
            INSERT INTO technicians (\
                id, user_id, category_id, is_available, \
                average_rating, ratings_count, total_jobs_completed, \
                status, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::BOOLEAN, \
                $5::NUMERIC, $6::INT4, $7::INT4, \
                $8::INT2, $9::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET category_id = EXCLUDED.category_id, \
                is_available = EXCLUDED.is_available, \
                average_rating = EXCLUDED.average_rating, \
                ratings_count = EXCLUDED.ratings_count, \
                total_jobs_completed = EXCLUDED.total_jobs_completed, \
                status = EXCLUDED.status";
        self.exec(
            SQL,
            &[
                &id,
                &user_id,
                &category_id,
                &is_available,
                &average_rating,
                &ratings_count,
                &total_jobs_completed,
                &status,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Technician, technician::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Technician, technician::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: technician::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM technicians \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

mod category {
    //! [`technician::Category`]-related [`Database`] implementations.

    use common::operations::{By, Insert, Lock, Select, Update};
    use tokio_postgres::Row;
    use tracerr::Traced;

    use crate::{
        domain::technician::{self, category, Category},
        infra::{
            database::{self, postgres::Connection, Postgres},
            Database,
        },
        read,
    };

    /// Columns of the `technician_categories` table, in the order
    /// [`from_row()`] expects.
    const COLUMNS: &str = "id, name, description, is_active";

    /// Builds a [`Category`] out of the provided [`Row`].
    fn from_row(row: &Row) -> Category {
        Category {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            is_active: row.get("is_active"),
        }
    }

    impl<C> Database<Select<By<Option<Category>, category::Id>>> for Postgres<C>
    where
        C: Connection,
    {
        type Ok = Option<Category>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<Option<Category>, category::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            let id = by.into_inner();

            let sql = format!(
                "SELECT {COLUMNS} \
                 FROM technician_categories \
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

    impl<'n, C> Database<Select<By<Option<Category>, &'n category::Name>>>
        for Postgres<C>
    where
        C: Connection,
    {
        type Ok = Option<Category>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<Option<Category>, &'n category::Name>>,
        ) -> Result<Self::Ok, Self::Err> {
            let name = by.into_inner();

            let sql = format!(
                "SELECT {COLUMNS} \
                 FROM technician_categories \
                 WHERE name = $1::VARCHAR",
            );
            Ok(self
                .query_opt(&sql, &[&name])
                .await
                .map_err(tracerr::wrap!())?
                .as_ref()
                .map(from_row))
        }
    }

    impl<C> Database<Select<By<Vec<Category>, read::technician::ActiveCategories>>>
        for Postgres<C>
    where
        C: Connection,
    {
        type Ok = Vec<Category>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Select<By<Vec<Category>, read::technician::ActiveCategories>>,
        ) -> Result<Self::Ok, Self::Err> {
            let sql = format!(
                "SELECT {COLUMNS} \
                 FROM technician_categories \
                 WHERE is_active \
                 ORDER BY name ASC",
            );
            Ok(self
                .query(&sql, &[])
                .await
                .map_err(tracerr::wrap!())?
                .iter()
                .map(from_row)
                .collect())
        }
    }

    impl<C> Database<Insert<Category>> for Postgres<C>
    where
        C: Connection,
        Self: Database<Update<Category>, Ok = (), Err = Traced<database::Error>>,
    {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Insert(category): Insert<Category>,
        ) -> Result<Self::Ok, Self::Err> {
            self.execute(Update(category))
                .await
                .map_err(tracerr::wrap!())
        }
    }

    impl<C> Database<Update<Category>> for Postgres<C>
    where
        C: Connection,
    {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Update(category): Update<Category>,
        ) -> Result<Self::Ok, Self::Err> {
            let Category {
                id,
                name,
                description,
                is_active,
            } = category;

            const SQL: &str = "\
                INSERT INTO technician_categories (\
                    id, name, description, is_active\
                ) \
                VALUES (\
                    $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::BOOLEAN\
                ) \
                ON CONFLICT (id) DO UPDATE \
                SET name = EXCLUDED.name, \
                    description = EXCLUDED.description, \
                    is_active = EXCLUDED.is_active";
            self.exec(SQL, &[&id, &name, &description, &is_active])
                .await
                .map_err(tracerr::wrap!())
                .map(drop)
        }
    }

    impl<C> Database<Lock<By<Category, category::Id>>> for Postgres<C>
    where
        C: Connection,
    {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Lock(by): Lock<By<Category, category::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            // Avoid subtle change for SQL.
            let id: technician::category::Id = by.into_inner();

            const SQL: &str = "\
                SELECT id \
                FROM technician_categories \
                WHERE id = $1::UUID \
                FOR UPDATE";
            self.query(SQL, &[&id])
                .await
                .map_err(tracerr::wrap!())
                .map(drop)
        }
    }
}

mod assignment {
    //! [`technician::Assignment`]-related [`Database`] implementations.

    use common::operations::{By, Insert, Select, Update};
    use tokio_postgres::Row;
    use tracerr::Traced;

    use crate::{
        domain::{property, technician},
        infra::{
            database::{self, postgres::Connection, Postgres},
            Database,
        },
    };

    /// Columns of the `technician_assignments` table, in the order
    /// [`from_row()`] expects.
    const COLUMNS: &str = "id, technician_id, property_id, is_active, assigned_at";

    /// Builds a [`technician::Assignment`] out of the provided [`Row`].
    fn from_row(row: &Row) -> technician::Assignment {
        technician::Assignment {
            id: row.get("id"),
            technician_id: row.get("technician_id"),
            property_id: row.get("property_id"),
            is_active: row.get("is_active"),
            assigned_at: row.get("assigned_at"),
        }
    }

    impl<C>
        Database<
            Select<
                By<
                    Option<technician::Assignment>,
                    (technician::Id, property::Id),
                >,
            >,
        > for Postgres<C>
    where
        C: Connection,
    {
        type Ok = Option<technician::Assignment>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<
                By<
                    Option<technician::Assignment>,
                    (technician::Id, property::Id),
                >,
            >,
        ) -> Result<Self::Ok, Self::Err> {
            let (technician_id, property_id) = by.into_inner();

            let sql = format!(
                "SELECT {COLUMNS} \
                 FROM technician_assignments \
                 WHERE technician_id = $1::UUID \
                   AND property_id = $2::UUID",
            );
            Ok(self
                .query_opt(&sql, &[&technician_id, &property_id])
                .await
                .map_err(tracerr::wrap!())?
                .as_ref()
                .map(from_row))
        }
    }

    impl<C> Database<Insert<technician::Assignment>> for Postgres<C>
    where
        C: Connection,
        Self: Database<
            Update<technician::Assignment>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
    {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Insert(assignment): Insert<technician::Assignment>,
        ) -> Result<Self::Ok, Self::Err> {
            self.execute(Update(assignment))
                .await
                .map_err(tracerr::wrap!())
        }
    }

    impl<C> Database<Update<technician::Assignment>> for Postgres<C>
    where
        C: Connection,
    {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Update(assignment): Update<technician::Assignment>,
        ) -> Result<Self::Ok, Self::Err> {
            let technician::Assignment {
                id,
                technician_id,
                property_id,
                is_active,
                assigned_at,
            } = assignment;

            const SQL: &str = "\
                INSERT INTO technician_assignments (\
                    id, technician_id, property_id, is_active, assigned_at\
                ) \
                VALUES (\
                    $1::UUID, $2::UUID, $3::UUID, $4::BOOLEAN, \
                    $5::TIMESTAMPTZ\
                ) \
                ON CONFLICT (id) DO UPDATE \
                SET is_active = EXCLUDED.is_active, \
                    assigned_at = EXCLUDED.assigned_at";
            self.exec(
                SQL,
                &[&id, &technician_id, &property_id, &is_active, &assigned_at],
            )
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
        }
    }
}

mod job {
    //! Job [`job::Update`]-related [`Database`] implementations.

    use common::operations::{By, Insert, Select};
    use tokio_postgres::Row;
    use tracerr::Traced;

    use crate::{
        domain::{maintenance, technician::job},
        infra::{
            database::{self, postgres::Connection, Postgres},
            Database,
        },
    };

    /// Columns of the `technician_job_updates` table, in the order
    /// [`from_row()`] expects.
    const COLUMNS: &str = "\
        id, request_id, technician_id, status, notes, kind, created_by, \
        created_at";

    /// Builds a [`job::Update`] out of the provided [`Row`].
    fn from_row(row: &Row) -> job::Update {
        job::Update {
            id: row.get("id"),
            request_id: row.get("request_id"),
            technician_id: row.get("technician_id"),
            status: row.get("status"),
            notes: row.get("notes"),
            kind: row.get("kind"),
            created_by: row.get("created_by"),
            created_at: row.get("created_at"),
        }
    }

    impl<C> Database<Select<By<Vec<job::Update>, maintenance::Id>>>
        for Postgres<C>
    where
        C: Connection,
    {
        type Ok = Vec<job::Update>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<Vec<job::Update>, maintenance::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            let request_id = by.into_inner();

            let sql = format!(
                "SELECT {COLUMNS} \
                 FROM technician_job_updates \
                 WHERE request_id = $1::UUID \
                 ORDER BY created_at DESC",
            );
            Ok(self
                .query(&sql, &[&request_id])
                .await
                .map_err(tracerr::wrap!())?
                .iter()
                .map(from_row)
                .collect())
        }
    }

    // Job updates are append-only.
    impl<C> Database<Insert<job::Update>> for Postgres<C>
    where
        C: Connection,
    {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Insert(update): Insert<job::Update>,
        ) -> Result<Self::Ok, Self::Err> {
            let job::Update {
                id,
                request_id,
                technician_id,
                status,
                notes,
                kind,
                created_by,
                created_at,
            } = update;

            const SQL: &str = "\
                INSERT INTO technician_job_updates (\
                    id, request_id, technician_id, status, notes, kind, \
                    created_by, created_at\
                ) \
                VALUES (\
                    $1::UUID, $2::UUID, $3::UUID, $4::INT2, $5::TEXT, \
                    $6::INT2, $7::UUID, $8::TIMESTAMPTZ\
                )";
            self.exec(
                SQL,
                &[
                    &id,
                    &request_id,
                    &technician_id,
                    &status,
                    &notes,
                    &kind,
                    &created_by,
                    &created_at,
                ],
            )
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
        }
    }
}
