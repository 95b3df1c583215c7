//! Gateway service: gateway CRUD kept consistent with the client cache.
//!
//! Every mutation invalidates the cached client of the gateway it touches,
//! so the next [`find_client`](GatewayService::find_client) reflects the
//! stored configuration.

use std::sync::Arc;

use domohub_domain::error::DomoHubError;
use domohub_domain::gateway::Gateway;
use domohub_domain::id::GatewayId;

use crate::client_cache::GatewayClientCache;
use crate::ports::{ClientFactory, PreferenceStore, Repository};

/// Application service for gateways and their protocol clients.
pub struct GatewayService<R, F: ClientFactory, P> {
    repo: Arc<R>,
    cache: Arc<GatewayClientCache<Arc<R>, F>>,
    preferences: P,
}

impl<R, F, P> GatewayService<R, F, P>
where
    R: Repository<Gateway> + Send + Sync,
    F: ClientFactory + Send + Sync,
    P: PreferenceStore,
{
    /// Create a service sharing `repo` with the client `cache`.
    pub fn new(repo: Arc<R>, cache: Arc<GatewayClientCache<Arc<R>, F>>, preferences: P) -> Self {
        Self {
            repo,
            cache,
            preferences,
        }
    }

    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] if invariants fail,
    /// [`DomoHubError::IntegrityViolation`] if the id is taken, or a storage
    /// error from the repository.
    #[tracing::instrument(skip(self, gateway), fields(gateway_id = %gateway.id))]
    pub async fn add_gateway(&self, gateway: Gateway) -> Result<GatewayId, DomoHubError> {
        gateway.validate()?;
        let id = self.repo.add(gateway).await?;
        self.cache.invalidate(id).await;
        Ok(id)
    }

    /// Replace a gateway's configuration and drop its cached client.
    ///
    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] if invariants fail,
    /// [`DomoHubError::NotFound`] if the gateway does not exist, or a storage
    /// error from the repository.
    #[tracing::instrument(skip(self, gateway), fields(gateway_id = %gateway.id))]
    pub async fn update_gateway(&self, gateway: Gateway) -> Result<(), DomoHubError> {
        gateway.validate()?;
        let id = gateway.id;
        self.repo.update(gateway).await?;
        self.cache.invalidate(id).await;
        Ok(())
    }

    /// Delete a gateway, drop its cached client and unset it as default.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository or the
    /// preference store.
    #[tracing::instrument(skip(self))]
    pub async fn delete_gateway(&self, id: GatewayId) -> Result<(), DomoHubError> {
        self.repo.delete(id).await?;
        self.cache.invalidate(id).await;
        if self.preferences.default_gateway().await? == Some(id) {
            self.preferences.set_default_gateway(None).await?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`DomoHubError::NotFound`] when no gateway with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_gateway(&self, id: GatewayId) -> Result<Gateway, DomoHubError> {
        self.repo.find_by_id(id).await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_gateways(&self) -> Result<Vec<Gateway>, DomoHubError> {
        self.repo.find_all().await
    }

    /// Protocol client for `id`, built on first use.
    ///
    /// # Errors
    ///
    /// See [`GatewayClientCache::find_client`].
    pub async fn find_client(&self, id: GatewayId) -> Result<Arc<F::Client>, DomoHubError> {
        self.cache.find_client(id).await
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the preference store.
    pub async fn default_gateway(&self) -> Result<Option<GatewayId>, DomoHubError> {
        self.preferences.default_gateway().await
    }

    /// Make `id` the gateway preselected for new records.
    ///
    /// # Errors
    ///
    /// Returns [`DomoHubError::NotFound`] when the gateway does not exist, or a
    /// storage error.
    #[tracing::instrument(skip(self))]
    pub async fn set_default_gateway(&self, id: GatewayId) -> Result<(), DomoHubError> {
        self.repo.find_by_id(id).await?;
        self.preferences.set_default_gateway(Some(id)).await
    }
}
