//! Storage-specific error type wrapping sqlx errors.

use domohub_domain::error::{DomoHubError, IntegrityError};

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored preference could not be parsed back.
    #[error("invalid stored value for preference {key:?}")]
    InvalidPreference {
        key: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<StorageError> for DomoHubError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Log a failed store operation and turn it into a [`DomoHubError`].
pub(crate) fn failure(
    operation: &'static str,
    table: &'static str,
    err: impl Into<StorageError>,
) -> DomoHubError {
    let err = err.into();
    tracing::error!(operation, table, error = ?err, "storage operation failed");
    err.into()
}

/// Like [`failure`], but maps a unique-key violation to
/// [`IntegrityError::DuplicateId`].
pub(crate) fn insert_failure(
    operation: &'static str,
    table: &'static str,
    entity: &'static str,
    id: impl ToString,
    err: sqlx::Error,
) -> DomoHubError {
    if let sqlx::Error::Database(db) = &err
        && db.is_unique_violation()
    {
        let id = id.to_string();
        tracing::warn!(operation, table, %id, "duplicate id rejected");
        return IntegrityError::DuplicateId { entity, id }.into();
    }
    failure(operation, table, err)
}

/// Wrap a column conversion failure the way sqlx reports decode errors.
pub(crate) fn decode_error(err: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(err))
}
