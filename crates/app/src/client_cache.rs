//! Gateway client cache: at most one live protocol client per gateway.
//!
//! Clients are built lazily: the first [`find_client`](GatewayClientCache::find_client)
//! for a gateway awaits the gateway lookup, builds the client through the
//! [`ClientFactory`] and stores it. Later calls return the same `Arc` without
//! touching the store. Concurrent misses on one gateway share a single
//! initialisation; failures are not cached.
//!
//! Entries never expire on their own. Whoever edits a gateway must call
//! [`invalidate`](GatewayClientCache::invalidate) (the
//! [`GatewayService`](crate::services::gateway_service::GatewayService) does);
//! [`verify`](GatewayClientCache::verify) detects entries that missed it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{OnceCell, RwLock};

use domohub_domain::error::{DomoHubError, StaleCacheError, TimeoutError};
use domohub_domain::gateway::{Gateway, GatewayEndpoint};
use domohub_domain::id::GatewayId;

use crate::ports::{ClientFactory, Repository};

/// Time limits applied when a cache miss has to build a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Upper bound for reading the gateway record.
    pub lookup_timeout: Duration,
    /// Upper bound for the client factory.
    pub connect_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            lookup_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

struct CachedClient<C> {
    endpoint: GatewayEndpoint,
    client: Arc<C>,
}

type Slot<C> = Arc<OnceCell<CachedClient<C>>>;

/// Process-wide map from gateway id to its protocol client.
pub struct GatewayClientCache<R, F: ClientFactory> {
    gateways: R,
    factory: F,
    config: CacheConfig,
    entries: RwLock<HashMap<GatewayId, Slot<F::Client>>>,
}

impl<R, F> GatewayClientCache<R, F>
where
    R: Repository<Gateway> + Send + Sync,
    F: ClientFactory + Send + Sync,
{
    /// Create an empty cache reading gateways from `gateways`.
    pub fn new(gateways: R, factory: F, config: CacheConfig) -> Self {
        Self {
            gateways,
            factory,
            config,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached client for `gateway_id`, building it on first use.
    ///
    /// # Errors
    ///
    /// - [`DomoHubError::NotFound`] when no such gateway is persisted
    /// - [`DomoHubError::Timeout`] when the lookup or the factory exceeds its limit
    /// - any error surfaced by the repository or the factory
    pub async fn find_client(&self, gateway_id: GatewayId) -> Result<Arc<F::Client>, DomoHubError> {
        let slot = self.slot(gateway_id).await;
        if let Some(cached) = slot.get() {
            tracing::debug!(%gateway_id, "client cache hit");
            return Ok(Arc::clone(&cached.client));
        }

        match slot.get_or_try_init(|| self.build(gateway_id)).await {
            Ok(cached) => Ok(Arc::clone(&cached.client)),
            Err(err) => {
                self.discard_empty(gateway_id, &slot).await;
                Err(err)
            }
        }
    }

    /// Check the cached client for `gateway_id` against the stored gateway.
    ///
    /// Succeeds when nothing is cached or the endpoint still matches. When the
    /// gateway changed or disappeared, the entry is dropped so the next
    /// [`find_client`](Self::find_client) rebuilds it.
    ///
    /// # Errors
    ///
    /// - [`DomoHubError::StaleCacheEntry`] when the cached entry was outdated
    /// - [`DomoHubError::Timeout`] or repository errors from the lookup
    pub async fn verify(&self, gateway_id: GatewayId) -> Result<(), DomoHubError> {
        let Some(cached) = self.cached_endpoint(gateway_id).await else {
            return Ok(());
        };

        let current = match self.lookup(gateway_id).await {
            Ok(gateway) => Some(gateway.endpoint()),
            Err(DomoHubError::NotFound(_)) => None,
            Err(err) => return Err(err),
        };

        if current.as_ref() == Some(&cached) {
            return Ok(());
        }

        tracing::warn!(%gateway_id, cached = %cached, "dropping stale gateway client");
        self.invalidate(gateway_id).await;
        Err(StaleCacheError {
            gateway_id: gateway_id.to_string(),
        }
        .into())
    }

    /// Drop the entry for `gateway_id`. Returns whether a client was cached.
    pub async fn invalidate(&self, gateway_id: GatewayId) -> bool {
        let removed = self.entries.write().await.remove(&gateway_id);
        let evicted = removed.is_some_and(|slot| slot.initialized());
        if evicted {
            tracing::info!(%gateway_id, "gateway client invalidated");
        }
        evicted
    }

    /// Drop every entry. Returns how many clients were cached.
    pub async fn invalidate_all(&self) -> usize {
        self.clear().await.len()
    }

    /// Empty the cache and hand the evicted clients back for disposal.
    pub async fn clear(&self) -> Vec<Arc<F::Client>> {
        let drained: Vec<_> = self.entries.write().await.drain().collect();
        let clients: Vec<_> = drained
            .into_iter()
            .filter_map(|(_, slot)| slot.get().map(|cached| Arc::clone(&cached.client)))
            .collect();
        if !clients.is_empty() {
            tracing::info!(count = clients.len(), "gateway client cache cleared");
        }
        clients
    }

    /// Number of cached clients.
    pub async fn len(&self) -> usize {
        self.entries
            .read()
            .await
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn slot(&self, gateway_id: GatewayId) -> Slot<F::Client> {
        if let Some(slot) = self.entries.read().await.get(&gateway_id) {
            return Arc::clone(slot);
        }
        let mut entries = self.entries.write().await;
        Arc::clone(entries.entry(gateway_id).or_default())
    }

    async fn cached_endpoint(&self, gateway_id: GatewayId) -> Option<GatewayEndpoint> {
        self.entries
            .read()
            .await
            .get(&gateway_id)
            .and_then(|slot| slot.get())
            .map(|cached| cached.endpoint.clone())
    }

    // Removes the slot after a failed build unless another caller replaced or filled it.
    async fn discard_empty(&self, gateway_id: GatewayId, slot: &Slot<F::Client>) {
        let mut entries = self.entries.write().await;
        if entries
            .get(&gateway_id)
            .is_some_and(|current| Arc::ptr_eq(current, slot) && !current.initialized())
        {
            entries.remove(&gateway_id);
        }
    }

    async fn lookup(&self, gateway_id: GatewayId) -> Result<Gateway, DomoHubError> {
        let after = self.config.lookup_timeout;
        tokio::time::timeout(after, self.gateways.find_by_id(gateway_id))
            .await
            .map_err(|_| TimeoutError {
                operation: "gateway lookup",
                after,
            })?
    }

    async fn build(&self, gateway_id: GatewayId) -> Result<CachedClient<F::Client>, DomoHubError> {
        let endpoint = self.lookup(gateway_id).await?.endpoint();

        let after = self.config.connect_timeout;
        let client = tokio::time::timeout(after, self.factory.connect(&endpoint))
            .await
            .map_err(|_| TimeoutError {
                operation: "gateway client construction",
                after,
            })??;

        tracing::info!(%gateway_id, %endpoint, "new client cached");
        Ok(CachedClient {
            endpoint,
            client: Arc::new(client),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeClient, FakeFactory, InMemoryRepository};
    use domohub_domain::gateway::DEFAULT_PORT;

    type Cache = GatewayClientCache<Arc<InMemoryRepository<Gateway>>, FakeFactory>;

    fn short_timeouts() -> CacheConfig {
        CacheConfig {
            lookup_timeout: Duration::from_millis(50),
            connect_timeout: Duration::from_millis(50),
        }
    }

    async fn setup() -> (Arc<InMemoryRepository<Gateway>>, Cache, Gateway) {
        let repo = Arc::new(InMemoryRepository::default());
        let gateway = Gateway::new("192.168.1.35", DEFAULT_PORT, None).unwrap();
        repo.add(gateway.clone()).await.unwrap();
        let cache = GatewayClientCache::new(Arc::clone(&repo), FakeFactory::default(), short_timeouts());
        (repo, cache, gateway)
    }

    #[tokio::test]
    async fn should_return_same_client_and_lookup_once_when_called_twice() {
        let (repo, cache, gateway) = setup().await;

        let first = cache.find_client(gateway.id).await.unwrap();
        let second = cache.find_client(gateway.id).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(repo.lookups(), 1);
        assert_eq!(cache.factory.builds(), 1);
        assert_eq!(first.endpoint, gateway.endpoint());
    }

    #[tokio::test]
    async fn should_build_once_when_misses_overlap() {
        let (repo, cache, gateway) = setup().await;
        repo.yield_on_lookup();

        let (a, b, c) = tokio::join!(
            cache.find_client(gateway.id),
            cache.find_client(gateway.id),
            cache.find_client(gateway.id),
        );

        let a = a.unwrap();
        assert!(Arc::ptr_eq(&a, &b.unwrap()));
        assert!(Arc::ptr_eq(&a, &c.unwrap()));
        assert_eq!(cache.factory.builds(), 1);
        assert_eq!(repo.lookups(), 1);
    }

    #[tokio::test]
    async fn should_fail_with_not_found_and_cache_nothing_when_gateway_missing() {
        let (_repo, cache, _gateway) = setup().await;

        let result = cache.find_client(GatewayId::new()).await;

        assert!(matches!(result, Err(DomoHubError::NotFound(_))));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn should_fail_with_timeout_when_lookup_stalls() {
        let (repo, cache, gateway) = setup().await;
        repo.stall_lookups();

        let result = cache.find_client(gateway.id).await;

        assert!(matches!(
            result,
            Err(DomoHubError::Timeout(TimeoutError {
                operation: "gateway lookup",
                ..
            }))
        ));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn should_retry_after_factory_failure() {
        let (_repo, cache, gateway) = setup().await;
        cache.factory.fail_next();

        let first = cache.find_client(gateway.id).await;
        assert!(matches!(first, Err(DomoHubError::Client(_))));

        let second = cache.find_client(gateway.id).await;
        assert!(second.is_ok());
        assert_eq!(cache.factory.builds(), 2);
    }

    #[tokio::test]
    async fn should_rebuild_with_new_configuration_after_invalidate() {
        let (repo, cache, gateway) = setup().await;
        let before = cache.find_client(gateway.id).await.unwrap();

        let moved = Gateway::with_id(gateway.id, "10.0.0.2", 20001, None).unwrap();
        repo.update(moved.clone()).await.unwrap();
        assert!(cache.invalidate(gateway.id).await);

        let after = cache.find_client(gateway.id).await.unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.endpoint, moved.endpoint());
        assert_eq!(repo.lookups(), 2);
    }

    #[tokio::test]
    async fn should_report_stale_entry_when_gateway_changed_without_invalidate() {
        let (repo, cache, gateway) = setup().await;
        cache.find_client(gateway.id).await.unwrap();

        let moved = Gateway::with_id(gateway.id, "10.0.0.2", DEFAULT_PORT, None).unwrap();
        repo.update(moved.clone()).await.unwrap();

        let result = cache.verify(gateway.id).await;
        assert!(matches!(result, Err(DomoHubError::StaleCacheEntry(_))));
        assert!(cache.is_empty().await);

        let fresh: Arc<FakeClient> = cache.find_client(gateway.id).await.unwrap();
        assert_eq!(fresh.endpoint.host, "10.0.0.2");
    }

    #[tokio::test]
    async fn should_report_stale_entry_when_gateway_deleted() {
        let (repo, cache, gateway) = setup().await;
        cache.find_client(gateway.id).await.unwrap();
        repo.delete(gateway.id).await.unwrap();

        let result = cache.verify(gateway.id).await;
        assert!(matches!(result, Err(DomoHubError::StaleCacheEntry(_))));
    }

    #[tokio::test]
    async fn should_verify_fresh_entry() {
        let (_repo, cache, gateway) = setup().await;
        assert!(cache.verify(gateway.id).await.is_ok());

        cache.find_client(gateway.id).await.unwrap();
        assert!(cache.verify(gateway.id).await.is_ok());
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn should_hand_back_clients_when_cleared() {
        let (repo, cache, gateway) = setup().await;
        let other = Gateway::new("192.168.1.36", DEFAULT_PORT, None).unwrap();
        repo.add(other.clone()).await.unwrap();
        cache.find_client(gateway.id).await.unwrap();
        cache.find_client(other.id).await.unwrap();

        let evicted = cache.clear().await;

        assert_eq!(evicted.len(), 2);
        assert!(cache.is_empty().await);
        assert_eq!(cache.invalidate_all().await, 0);
    }
}
