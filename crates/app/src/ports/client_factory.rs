//! Client factory port: builds protocol clients for gateways.
//!
//! The wire protocol itself lives behind this trait. The application only
//! needs to turn a [`GatewayEndpoint`] into a handle it can cache.

use std::future::Future;

use domohub_domain::error::DomoHubError;
use domohub_domain::gateway::GatewayEndpoint;

/// Builds a client handle from gateway connection settings.
pub trait ClientFactory {
    /// Handle used later to dispatch commands to the gateway.
    type Client: Send + Sync + 'static;

    /// Build a client for `endpoint`.
    ///
    /// Implementations surface their own failures as [`DomoHubError::Client`].
    fn connect(
        &self,
        endpoint: &GatewayEndpoint,
    ) -> impl Future<Output = Result<Self::Client, DomoHubError>> + Send;
}
