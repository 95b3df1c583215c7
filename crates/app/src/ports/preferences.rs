//! Preference store port: small key/value facts the bootstrap hook relies on.

use std::future::Future;
use std::sync::Arc;

use domohub_domain::error::DomoHubError;
use domohub_domain::id::GatewayId;
use domohub_domain::time::Timestamp;

/// Persistent application preferences.
pub trait PreferenceStore {
    /// When the first run completed, or `None` if it never did.
    fn first_run_at(
        &self,
    ) -> impl Future<Output = Result<Option<Timestamp>, DomoHubError>> + Send;

    /// Record that the first run completed at `at`.
    fn mark_first_run(&self, at: Timestamp)
    -> impl Future<Output = Result<(), DomoHubError>> + Send;

    /// Application version seen by the previous start, if any.
    fn last_version(&self) -> impl Future<Output = Result<Option<String>, DomoHubError>> + Send;

    fn set_last_version(
        &self,
        version: &str,
    ) -> impl Future<Output = Result<(), DomoHubError>> + Send;

    /// Gateway preselected when creating new records.
    fn default_gateway(
        &self,
    ) -> impl Future<Output = Result<Option<GatewayId>, DomoHubError>> + Send;

    /// Set or clear the default gateway.
    fn set_default_gateway(
        &self,
        gateway_id: Option<GatewayId>,
    ) -> impl Future<Output = Result<(), DomoHubError>> + Send;
}

impl<P: PreferenceStore + Send + Sync> PreferenceStore for Arc<P> {
    fn first_run_at(
        &self,
    ) -> impl Future<Output = Result<Option<Timestamp>, DomoHubError>> + Send {
        (**self).first_run_at()
    }

    fn mark_first_run(
        &self,
        at: Timestamp,
    ) -> impl Future<Output = Result<(), DomoHubError>> + Send {
        (**self).mark_first_run(at)
    }

    fn last_version(&self) -> impl Future<Output = Result<Option<String>, DomoHubError>> + Send {
        (**self).last_version()
    }

    fn set_last_version(
        &self,
        version: &str,
    ) -> impl Future<Output = Result<(), DomoHubError>> + Send {
        (**self).set_last_version(version)
    }

    fn default_gateway(
        &self,
    ) -> impl Future<Output = Result<Option<GatewayId>, DomoHubError>> + Send {
        (**self).default_gateway()
    }

    fn set_default_gateway(
        &self,
        gateway_id: Option<GatewayId>,
    ) -> impl Future<Output = Result<(), DomoHubError>> + Send {
        (**self).set_default_gateway(gateway_id)
    }
}
