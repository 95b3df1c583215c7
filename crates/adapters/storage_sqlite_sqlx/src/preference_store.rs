//! `SQLite` implementation of [`PreferenceStore`] over a key/value table.

use std::future::Future;
use std::str::FromStr;

use sqlx::SqlitePool;

use domohub_app::ports::PreferenceStore;
use domohub_domain::error::DomoHubError;
use domohub_domain::id::GatewayId;
use domohub_domain::time::{self, Timestamp};

use crate::error::{StorageError, failure};

const TABLE: &str = "preferences";

const FIRST_RUN_AT: &str = "first_run_at";
const LAST_VERSION: &str = "last_version";
const DEFAULT_GATEWAY: &str = "default_gateway";

const SELECT: &str = "SELECT value FROM preferences WHERE key = ?";
const UPSERT: &str = r"
    INSERT INTO preferences (key, value) VALUES (?, ?)
    ON CONFLICT (key) DO UPDATE SET value = excluded.value
";
const DELETE: &str = "DELETE FROM preferences WHERE key = ?";

/// `SQLite`-backed preference store.
pub struct SqlitePreferenceStore {
    pool: SqlitePool,
}

impl SqlitePreferenceStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn get(&self, key: &'static str) -> Result<Option<String>, DomoHubError> {
        sqlx::query_scalar(SELECT)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| failure("get", TABLE, err))
    }

    async fn get_parsed<V, E>(
        &self,
        key: &'static str,
        parse: impl FnOnce(&str) -> Result<V, E>,
    ) -> Result<Option<V>, DomoHubError>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let Some(raw) = self.get(key).await? else {
            return Ok(None);
        };
        parse(&raw).map(Some).map_err(|err| {
            failure(
                "get",
                TABLE,
                StorageError::InvalidPreference {
                    key,
                    source: Box::new(err),
                },
            )
        })
    }

    async fn set(&self, key: &'static str, value: String) -> Result<(), DomoHubError> {
        sqlx::query(UPSERT)
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(|err| failure("set", TABLE, err))?;

        Ok(())
    }

    async fn unset(&self, key: &'static str) -> Result<(), DomoHubError> {
        sqlx::query(DELETE)
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|err| failure("unset", TABLE, err))?;

        Ok(())
    }
}

impl PreferenceStore for SqlitePreferenceStore {
    fn first_run_at(
        &self,
    ) -> impl Future<Output = Result<Option<Timestamp>, DomoHubError>> + Send {
        self.get_parsed(FIRST_RUN_AT, time::parse)
    }

    fn mark_first_run(
        &self,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), DomoHubError>> + Send {
        self.set(FIRST_RUN_AT, time::format(at))
    }

    fn last_version(&self) -> impl Future<Output = Result<Option<String>, DomoHubError>> + Send {
        self.get(LAST_VERSION)
    }

    fn set_last_version(
        &self,
        version: &str,
    ) -> impl Future<Output = Result<(), DomoHubError>> + Send {
        self.set(LAST_VERSION, version.to_string())
    }

    fn default_gateway(
        &self,
    ) -> impl Future<Output = Result<Option<GatewayId>, DomoHubError>> + Send {
        self.get_parsed(DEFAULT_GATEWAY, GatewayId::from_str)
    }

    fn set_default_gateway(
        &self,
        gateway_id: Option<GatewayId>,
    ) -> impl Future<Output = Result<(), DomoHubError>> + Send {
        async move {
            match gateway_id {
                Some(id) => self.set(DEFAULT_GATEWAY, id.to_string()).await,
                None => self.unset(DEFAULT_GATEWAY).await,
            }
        }
    }
}
