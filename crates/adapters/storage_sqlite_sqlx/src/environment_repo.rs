//! `SQLite` implementation of [`EnvironmentRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use domohub_app::ports::{EnvironmentRepository, exactly_one};
use domohub_domain::environment::Environment;
use domohub_domain::error::{DomoHubError, NotFoundError, ValidationError};
use domohub_domain::id::EnvironmentId;

use crate::error::{failure, insert_failure};
use crate::tables::{ENVIRONMENT_OWNED, decode_environment_id};

const TABLE: &str = "environments";
const ENTITY: &str = "Environment";

/// Wrapper for converting database rows into domain [`Environment`].
struct Wrapper(Environment);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;

        Ok(Self(Environment {
            id: decode_environment_id(id)?,
            name: row.try_get("name")?,
        }))
    }
}

const SELECT_MAX_ID: &str = "SELECT MAX(id) FROM environments";
// Inserts nothing once the sequence would step past `u32::MAX`.
const CREATE: &str = r"
    INSERT INTO environments (id, name)
    SELECT next_id, ? FROM (
        SELECT COALESCE(MAX(id) + 1, 100) AS next_id FROM environments
    )
    WHERE next_id <= 4294967295
    RETURNING id
";
const INSERT: &str = "INSERT INTO environments (id, name) VALUES (?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM environments WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM environments ORDER BY name";
const UPDATE: &str = "UPDATE environments SET name = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM environments WHERE id = ?";

/// `SQLite`-backed environment repository.
pub struct SqliteEnvironmentRepository {
    pool: SqlitePool,
}

impl SqliteEnvironmentRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl EnvironmentRepository for SqliteEnvironmentRepository {
    fn next_id(&self) -> impl Future<Output = Result<EnvironmentId, DomoHubError>> + Send {
        async move {
            let max: Option<i64> = sqlx::query_scalar(SELECT_MAX_ID)
                .fetch_one(&self.pool)
                .await
                .map_err(|err| failure("next_id", TABLE, err))?;

            let max = max
                .map(decode_environment_id)
                .transpose()
                .map_err(|err| failure("next_id", TABLE, err))?;
            Ok(EnvironmentId::after(max)?)
        }
    }

    fn create(
        &self,
        name: String,
    ) -> impl Future<Output = Result<Environment, DomoHubError>> + Send {
        async move {
            let id: Option<i64> = sqlx::query_scalar(CREATE)
                .bind(&name)
                .fetch_optional(&self.pool)
                .await
                .map_err(|err| failure("create", TABLE, err))?;

            let Some(id) = id else {
                tracing::warn!("environment id sequence exhausted");
                return Err(ValidationError::EnvironmentIdsExhausted.into());
            };

            let id = decode_environment_id(id).map_err(|err| failure("create", TABLE, err))?;
            tracing::debug!(environment_id = %id, "environment created");
            Ok(Environment { id, name })
        }
    }

    fn add(
        &self,
        environment: Environment,
    ) -> impl Future<Output = Result<EnvironmentId, DomoHubError>> + Send {
        async move {
            let id = environment.id;
            sqlx::query(INSERT)
                .bind(i64::from(id.value()))
                .bind(&environment.name)
                .execute(&self.pool)
                .await
                .map_err(|err| insert_failure("add", TABLE, ENTITY, id, err))?;

            Ok(id)
        }
    }

    fn find(
        &self,
        id: EnvironmentId,
    ) -> impl Future<Output = Result<Environment, DomoHubError>> + Send {
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(i64::from(id.value()))
                .fetch_all(&self.pool)
                .await
                .map_err(|err| failure("find", TABLE, err))?;

            exactly_one(rows.into_iter().map(|w| w.0).collect(), ENTITY, id)
        }
    }

    fn find_all(&self) -> impl Future<Output = Result<Vec<Environment>, DomoHubError>> + Send {
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&self.pool)
                .await
                .map_err(|err| failure("find_all", TABLE, err))?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update(
        &self,
        environment: Environment,
    ) -> impl Future<Output = Result<(), DomoHubError>> + Send {
        async move {
            let result = sqlx::query(UPDATE)
                .bind(&environment.name)
                .bind(i64::from(environment.id.value()))
                .execute(&self.pool)
                .await
                .map_err(|err| failure("update", TABLE, err))?;

            if result.rows_affected() == 0 {
                return Err(NotFoundError {
                    entity: ENTITY,
                    id: environment.id.to_string(),
                }
                .into());
            }
            Ok(())
        }
    }

    fn delete(&self, id: EnvironmentId) -> impl Future<Output = Result<(), DomoHubError>> + Send {
        async move {
            let key = i64::from(id.value());
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(|err| failure("delete", TABLE, err))?;

            for owned in ENVIRONMENT_OWNED {
                let statement = format!("DELETE FROM {owned} WHERE environment_id = ?");
                let result = sqlx::query(&statement)
                    .bind(key)
                    .execute(&mut *tx)
                    .await
                    .map_err(|err| failure("delete", owned, err))?;
                tracing::debug!(table = owned, rows = result.rows_affected(), "cascade");
            }

            sqlx::query(DELETE_BY_ID)
                .bind(key)
                .execute(&mut *tx)
                .await
                .map_err(|err| failure("delete", TABLE, err))?;

            tx.commit()
                .await
                .map_err(|err| failure("delete", TABLE, err))?;

            Ok(())
        }
    }
}
