//! Environment service: use-cases for managing environments.

use domohub_domain::environment::Environment;
use domohub_domain::error::{DomoHubError, ValidationError};
use domohub_domain::id::EnvironmentId;

use crate::ports::EnvironmentRepository;

/// Application service for environments.
pub struct EnvironmentService<R> {
    repo: R,
}

impl<R: EnvironmentRepository> EnvironmentService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create an environment named `name`, reserving its id atomically.
    ///
    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] if the name is blank, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn create_environment(&self, name: &str) -> Result<Environment, DomoHubError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        self.repo.create(name.to_string()).await
    }

    /// Peek at the id the next environment would receive.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn next_id(&self) -> Result<EnvironmentId, DomoHubError> {
        self.repo.next_id().await
    }

    /// Persist an environment whose id was chosen by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] if invariants fail,
    /// [`DomoHubError::IntegrityViolation`] if the id is taken, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self, environment), fields(environment_id = %environment.id))]
    pub async fn add_environment(
        &self,
        environment: Environment,
    ) -> Result<EnvironmentId, DomoHubError> {
        environment.validate()?;
        self.repo.add(environment).await
    }

    /// # Errors
    ///
    /// Returns [`DomoHubError::NotFound`] when no environment with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_environment(&self, id: EnvironmentId) -> Result<Environment, DomoHubError> {
        self.repo.find(id).await
    }

    /// List all environments sorted by name.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_environments(&self) -> Result<Vec<Environment>, DomoHubError> {
        self.repo.find_all().await
    }

    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] if the new name is blank,
    /// [`DomoHubError::NotFound`] if the environment does not exist, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn rename_environment(
        &self,
        id: EnvironmentId,
        name: &str,
    ) -> Result<Environment, DomoHubError> {
        let environment = Environment::new(id, name.trim())?;
        self.repo.update(environment.clone()).await?;
        Ok(environment)
    }

    /// Delete an environment together with everything it owns.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository; in that case
    /// nothing was deleted.
    #[tracing::instrument(skip(self))]
    pub async fn delete_environment(&self, id: EnvironmentId) -> Result<(), DomoHubError> {
        self.repo.delete(id).await
    }
}
