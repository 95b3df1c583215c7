//! One repository implementation shared by every record table.
//!
//! A record type opts in by implementing [`Table`]: its table name, its
//! non-key columns and how a row is encoded and decoded. [`SqliteRepository`]
//! derives every statement from that description.

use std::future::Future;
use std::marker::PhantomData;

use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite, SqlitePool};

use domohub_app::ports::{DomoticRepository, Repository, exactly_one};
use domohub_domain::error::{DomoHubError, NotFoundError};
use domohub_domain::id::EnvironmentId;
use domohub_domain::record::{Domotic, Record};

use crate::error::{failure, insert_failure};

pub type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Mapping between a record type and its table.
///
/// Every table has a text `id` primary key. Domotic tables also carry
/// `environment_id`, `name` and `favourite`, which the per-environment and
/// favourite queries rely on.
pub trait Table: Record + Unpin {
    const TABLE: &'static str;

    /// Every column except `id`, in the order [`bind_columns`](Self::bind_columns) binds them.
    const COLUMNS: &'static [&'static str];

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q>;

    /// # Errors
    ///
    /// Returns [`sqlx::Error`] if a column is missing or holds an invalid value.
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error>;
}

/// Wrapper for converting database rows into domain records without
/// polluting domain structs with database concerns.
struct Wrapper<T>(T);

impl<'r, T: Table> FromRow<'r, SqliteRow> for Wrapper<T> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        T::from_row(row).map(Self)
    }
}

fn unwrap_all<T>(rows: Vec<Wrapper<T>>) -> Vec<T> {
    rows.into_iter().map(|w| w.0).collect()
}

struct Statements {
    insert: String,
    update: String,
    delete_by_id: String,
    delete_all: String,
    select_by_id: String,
    select_all: String,
    select_by_environment: String,
    select_favourites: String,
}

impl Statements {
    fn new(table: &str, columns: &[&str]) -> Self {
        let names = std::iter::once("id")
            .chain(columns.iter().copied())
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; columns.len() + 1].join(", ");
        let assignments = columns
            .iter()
            .map(|c| format!("{c} = ?"))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            insert: format!("INSERT INTO {table} ({names}) VALUES ({placeholders})"),
            update: format!("UPDATE {table} SET {assignments} WHERE id = ?"),
            delete_by_id: format!("DELETE FROM {table} WHERE id = ?"),
            delete_all: format!("DELETE FROM {table}"),
            select_by_id: format!("SELECT * FROM {table} WHERE id = ?"),
            select_all: format!("SELECT * FROM {table} ORDER BY rowid"),
            select_by_environment: format!(
                "SELECT * FROM {table} WHERE environment_id = ? ORDER BY name"
            ),
            select_favourites: format!("SELECT * FROM {table} WHERE favourite = 1 ORDER BY name"),
        }
    }
}

/// `SQLite`-backed repository for any [`Table`].
pub struct SqliteRepository<T> {
    pool: SqlitePool,
    sql: Statements,
    _table: PhantomData<fn() -> T>,
}

impl<T: Table> SqliteRepository<T> {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            sql: Statements::new(T::TABLE, T::COLUMNS),
            _table: PhantomData,
        }
    }
}

impl<T: Table> Repository<T> for SqliteRepository<T> {
    fn add(&self, record: T) -> impl Future<Output = Result<T::Id, DomoHubError>> + Send {
        async move {
            let id = record.id();
            record
                .bind_columns(sqlx::query(&self.sql.insert).bind(id.to_string()))
                .execute(&self.pool)
                .await
                .map_err(|err| insert_failure("add", T::TABLE, T::KIND, id, err))?;

            Ok(id)
        }
    }

    fn add_all(
        &self,
        records: Vec<T>,
    ) -> impl Future<Output = Result<Vec<T::Id>, DomoHubError>> + Send {
        async move {
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(|err| failure("add_all", T::TABLE, err))?;

            let mut ids = Vec::with_capacity(records.len());
            for record in &records {
                let id = record.id();
                record
                    .bind_columns(sqlx::query(&self.sql.insert).bind(id.to_string()))
                    .execute(&mut *tx)
                    .await
                    .map_err(|err| insert_failure("add_all", T::TABLE, T::KIND, id, err))?;
                ids.push(id);
            }

            tx.commit()
                .await
                .map_err(|err| failure("add_all", T::TABLE, err))?;

            Ok(ids)
        }
    }

    fn update(&self, record: T) -> impl Future<Output = Result<(), DomoHubError>> + Send {
        async move {
            let id = record.id();
            let result = record
                .bind_columns(sqlx::query(&self.sql.update))
                .bind(id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|err| failure("update", T::TABLE, err))?;

            if result.rows_affected() == 0 {
                return Err(NotFoundError {
                    entity: T::KIND,
                    id: id.to_string(),
                }
                .into());
            }
            Ok(())
        }
    }

    fn delete(&self, id: T::Id) -> impl Future<Output = Result<(), DomoHubError>> + Send {
        async move {
            sqlx::query(&self.sql.delete_by_id)
                .bind(id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|err| failure("delete", T::TABLE, err))?;

            Ok(())
        }
    }

    fn delete_all(&self) -> impl Future<Output = Result<(), DomoHubError>> + Send {
        async move {
            sqlx::query(&self.sql.delete_all)
                .execute(&self.pool)
                .await
                .map_err(|err| failure("delete_all", T::TABLE, err))?;

            Ok(())
        }
    }

    fn find_by_id(&self, id: T::Id) -> impl Future<Output = Result<T, DomoHubError>> + Send {
        async move {
            let rows: Vec<Wrapper<T>> = sqlx::query_as(&self.sql.select_by_id)
                .bind(id.to_string())
                .fetch_all(&self.pool)
                .await
                .map_err(|err| failure("find_by_id", T::TABLE, err))?;

            exactly_one(unwrap_all(rows), T::KIND, id)
        }
    }

    fn find_all(&self) -> impl Future<Output = Result<Vec<T>, DomoHubError>> + Send {
        async move {
            let rows: Vec<Wrapper<T>> = sqlx::query_as(&self.sql.select_all)
                .fetch_all(&self.pool)
                .await
                .map_err(|err| failure("find_all", T::TABLE, err))?;

            Ok(unwrap_all(rows))
        }
    }
}

impl<T: Table + Domotic> DomoticRepository<T> for SqliteRepository<T> {
    fn find_by_environment(
        &self,
        environment_id: EnvironmentId,
    ) -> impl Future<Output = Result<Vec<T>, DomoHubError>> + Send {
        async move {
            let rows: Vec<Wrapper<T>> = sqlx::query_as(&self.sql.select_by_environment)
                .bind(i64::from(environment_id.value()))
                .fetch_all(&self.pool)
                .await
                .map_err(|err| failure("find_by_environment", T::TABLE, err))?;

            Ok(unwrap_all(rows))
        }
    }

    fn find_favourites(&self) -> impl Future<Output = Result<Vec<T>, DomoHubError>> + Send {
        async move {
            let rows: Vec<Wrapper<T>> = sqlx::query_as(&self.sql.select_favourites)
                .fetch_all(&self.pool)
                .await
                .map_err(|err| failure("find_favourites", T::TABLE, err))?;

            Ok(unwrap_all(rows))
        }
    }
}
