//! Start-up hook: first-run seeding and version bookkeeping.

use domohub_domain::error::{DomoHubError, ValidationError};
use domohub_domain::id::EnvironmentId;
use domohub_domain::time;

use crate::ports::{EnvironmentRepository, PreferenceStore};

/// What [`Bootstrap::run`] changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BootstrapReport {
    /// Environment created because this was the first run.
    pub seeded_environment: Option<EnvironmentId>,
    /// Version recorded by the previous run, when it differs from the current one.
    pub upgraded_from: Option<String>,
}

/// Start-up hook run once per process before the services are used.
pub struct Bootstrap<P, E> {
    preferences: P,
    environments: E,
}

impl<P: PreferenceStore, E: EnvironmentRepository> Bootstrap<P, E> {
    /// Create the hook over the preference store and the environment repository.
    pub fn new(preferences: P, environments: E) -> Self {
        Self {
            preferences,
            environments,
        }
    }

    /// Seed a default environment on first run and record `version`.
    ///
    /// Safe to call on every start: once the first-run flag is set, only a
    /// version change is recorded. Seeding is skipped when environments
    /// already exist, so a run that created the default environment but failed
    /// to set the flag does not create a second one on retry.
    ///
    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] if `default_environment` is blank,
    /// or a storage error from either store.
    #[tracing::instrument(skip(self))]
    pub async fn run(
        &self,
        version: &str,
        default_environment: &str,
    ) -> Result<BootstrapReport, DomoHubError> {
        let mut report = BootstrapReport::default();

        if self.preferences.first_run_at().await?.is_none() {
            if self.environments.find_all().await?.is_empty() {
                let name = default_environment.trim();
                if name.is_empty() {
                    return Err(ValidationError::EmptyName.into());
                }
                let environment = self.environments.create(name.to_string()).await?;
                tracing::info!(environment_id = %environment.id, name, "first run, default environment created");
                report.seeded_environment = Some(environment.id);
            } else {
                tracing::info!("first run, environments already present");
            }
            self.preferences.mark_first_run(time::now()).await?;
        }

        let previous = self.preferences.last_version().await?;
        if previous.as_deref() != Some(version) {
            self.preferences.set_last_version(version).await?;
            if let Some(previous) = previous {
                tracing::info!(from = %previous, to = version, "application upgraded");
                report.upgraded_from = Some(previous);
            }
        }

        Ok(report)
    }
}
