//! Generic repository port: asynchronous CRUD over any [`Record`].
//!
//! One trait serves every record type; adapters supply a single shared
//! implementation configured per table.
//!
//! Missing-row policy:
//! - `delete` of an absent id succeeds (idempotent).
//! - `update` of an absent id fails with [`DomoHubError::NotFound`].
//! - `add` of an existing id fails with [`DomoHubError::IntegrityViolation`].

use std::future::Future;
use std::sync::Arc;

use domohub_domain::error::{DomoHubError, IntegrityError, NotFoundError};
use domohub_domain::id::EnvironmentId;
use domohub_domain::record::{Domotic, Record};

/// Asynchronous CRUD contract for one record type.
pub trait Repository<T: Record> {
    /// Insert a new record and return its id.
    fn add(&self, record: T) -> impl Future<Output = Result<T::Id, DomoHubError>> + Send;

    /// Insert several records atomically, returning ids in input order.
    fn add_all(
        &self,
        records: Vec<T>,
    ) -> impl Future<Output = Result<Vec<T::Id>, DomoHubError>> + Send;

    /// Replace the stored fields of an existing record.
    fn update(&self, record: T) -> impl Future<Output = Result<(), DomoHubError>> + Send;

    /// Remove the record with `id`, if any.
    fn delete(&self, id: T::Id) -> impl Future<Output = Result<(), DomoHubError>> + Send;

    /// Remove every record of the table.
    fn delete_all(&self) -> impl Future<Output = Result<(), DomoHubError>> + Send;

    /// Point lookup; see [`exactly_one`] for the failure kinds.
    fn find_by_id(&self, id: T::Id) -> impl Future<Output = Result<T, DomoHubError>> + Send;

    /// Every record of the table, in store order.
    fn find_all(&self) -> impl Future<Output = Result<Vec<T>, DomoHubError>> + Send;
}

/// Queries shared by all device-like records.
pub trait DomoticRepository<T: Domotic>: Repository<T> {
    /// Records owned by `environment_id`, sorted by name.
    fn find_by_environment(
        &self,
        environment_id: EnvironmentId,
    ) -> impl Future<Output = Result<Vec<T>, DomoHubError>> + Send;

    /// Records flagged as favourite, sorted by name.
    fn find_favourites(&self) -> impl Future<Output = Result<Vec<T>, DomoHubError>> + Send;
}

impl<T: Record, R: Repository<T> + Send + Sync> Repository<T> for Arc<R> {
    fn add(&self, record: T) -> impl Future<Output = Result<T::Id, DomoHubError>> + Send {
        (**self).add(record)
    }

    fn add_all(
        &self,
        records: Vec<T>,
    ) -> impl Future<Output = Result<Vec<T::Id>, DomoHubError>> + Send {
        (**self).add_all(records)
    }

    fn update(&self, record: T) -> impl Future<Output = Result<(), DomoHubError>> + Send {
        (**self).update(record)
    }

    fn delete(&self, id: T::Id) -> impl Future<Output = Result<(), DomoHubError>> + Send {
        (**self).delete(id)
    }

    fn delete_all(&self) -> impl Future<Output = Result<(), DomoHubError>> + Send {
        (**self).delete_all()
    }

    fn find_by_id(&self, id: T::Id) -> impl Future<Output = Result<T, DomoHubError>> + Send {
        (**self).find_by_id(id)
    }

    fn find_all(&self) -> impl Future<Output = Result<Vec<T>, DomoHubError>> + Send {
        (**self).find_all()
    }
}

impl<T: Domotic, R: DomoticRepository<T> + Send + Sync> DomoticRepository<T> for Arc<R> {
    fn find_by_environment(
        &self,
        environment_id: EnvironmentId,
    ) -> impl Future<Output = Result<Vec<T>, DomoHubError>> + Send {
        (**self).find_by_environment(environment_id)
    }

    fn find_favourites(&self) -> impl Future<Output = Result<Vec<T>, DomoHubError>> + Send {
        (**self).find_favourites()
    }
}

/// Resolve a point lookup to its single row.
///
/// # Errors
///
/// - [`DomoHubError::NotFound`] when `rows` is empty
/// - [`DomoHubError::IntegrityViolation`] when more than one row matched
pub fn exactly_one<T>(
    mut rows: Vec<T>,
    entity: &'static str,
    id: impl ToString,
) -> Result<T, DomoHubError> {
    match rows.len() {
        0 => Err(NotFoundError {
            entity,
            id: id.to_string(),
        }
        .into()),
        1 => Ok(rows.remove(0)),
        count => Err(IntegrityError::MultipleRows {
            entity,
            id: id.to_string(),
            count,
        }
        .into()),
    }
}
