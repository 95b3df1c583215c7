//! Environment repository port: integer id sequence and cascading delete.

use std::future::Future;
use std::sync::Arc;

use domohub_domain::environment::Environment;
use domohub_domain::error::DomoHubError;
use domohub_domain::id::EnvironmentId;

/// Persistence for [`Environment`]s and the records they own.
pub trait EnvironmentRepository {
    /// `max(existing id) + 1`, or [`EnvironmentId::INITIAL`] on an empty table.
    ///
    /// Read-then-decide: two callers may observe the same value. Use
    /// [`create`](Self::create) when the id is not chosen by the caller.
    fn next_id(&self) -> impl Future<Output = Result<EnvironmentId, DomoHubError>> + Send;

    /// Reserve the next id and insert an environment named `name` as one
    /// atomic step.
    fn create(&self, name: String)
    -> impl Future<Output = Result<Environment, DomoHubError>> + Send;

    /// Persist an environment carrying a caller-chosen id and return that id.
    ///
    /// Fails with [`DomoHubError::IntegrityViolation`] if the id is taken.
    fn add(
        &self,
        environment: Environment,
    ) -> impl Future<Output = Result<EnvironmentId, DomoHubError>> + Send;

    /// Point lookup by id.
    fn find(
        &self,
        id: EnvironmentId,
    ) -> impl Future<Output = Result<Environment, DomoHubError>> + Send;

    /// Every environment, sorted ascending by name.
    fn find_all(&self) -> impl Future<Output = Result<Vec<Environment>, DomoHubError>> + Send;

    /// Rename an existing environment; fails with [`DomoHubError::NotFound`]
    /// if it does not exist.
    fn update(
        &self,
        environment: Environment,
    ) -> impl Future<Output = Result<(), DomoHubError>> + Send;

    /// Delete the environment and every record it owns in one transaction.
    ///
    /// Owned records go first and the environment row last. Deleting an
    /// absent environment succeeds.
    fn delete(&self, id: EnvironmentId) -> impl Future<Output = Result<(), DomoHubError>> + Send;
}

impl<R: EnvironmentRepository + Send + Sync> EnvironmentRepository for Arc<R> {
    fn next_id(&self) -> impl Future<Output = Result<EnvironmentId, DomoHubError>> + Send {
        (**self).next_id()
    }

    fn create(
        &self,
        name: String,
    ) -> impl Future<Output = Result<Environment, DomoHubError>> + Send {
        (**self).create(name)
    }

    fn add(
        &self,
        environment: Environment,
    ) -> impl Future<Output = Result<EnvironmentId, DomoHubError>> + Send {
        (**self).add(environment)
    }

    fn find(
        &self,
        id: EnvironmentId,
    ) -> impl Future<Output = Result<Environment, DomoHubError>> + Send {
        (**self).find(id)
    }

    fn find_all(&self) -> impl Future<Output = Result<Vec<Environment>, DomoHubError>> + Send {
        (**self).find_all()
    }

    fn update(
        &self,
        environment: Environment,
    ) -> impl Future<Output = Result<(), DomoHubError>> + Send {
        (**self).update(environment)
    }

    fn delete(&self, id: EnvironmentId) -> impl Future<Output = Result<(), DomoHubError>> + Send {
        (**self).delete(id)
    }
}
