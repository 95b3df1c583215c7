//! [`ClientFactory`] implementation resolving gateways over the network.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use domohub_app::ports::ClientFactory;
use domohub_domain::error::DomoHubError;
use domohub_domain::gateway::GatewayEndpoint;

use crate::client::GatewayClient;
use crate::error::TcpClientError;

/// Builds [`GatewayClient`]s from gateway endpoints.
#[derive(Debug, Clone)]
pub struct TcpClientFactory {
    connect_timeout: Duration,
}

impl TcpClientFactory {
    /// `connect_timeout` bounds both name resolution and every session opened
    /// by the clients this factory builds.
    #[must_use]
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    async fn resolve(&self, endpoint: &GatewayEndpoint) -> Result<Vec<SocketAddr>, TcpClientError> {
        let target = (endpoint.host.as_str(), endpoint.port);
        let addresses = tokio::time::timeout(self.connect_timeout, tokio::net::lookup_host(target))
            .await
            .map_err(|_| TcpClientError::Timeout {
                operation: "gateway address resolution",
                after: self.connect_timeout,
            })?
            .map_err(|source| TcpClientError::Resolve {
                endpoint: endpoint.to_string(),
                source,
            })?
            .collect::<Vec<_>>();

        if addresses.is_empty() {
            return Err(TcpClientError::NoAddress {
                endpoint: endpoint.to_string(),
            });
        }
        Ok(addresses)
    }
}

impl ClientFactory for TcpClientFactory {
    type Client = GatewayClient;

    fn connect(
        &self,
        endpoint: &GatewayEndpoint,
    ) -> impl Future<Output = Result<Self::Client, DomoHubError>> + Send {
        let endpoint = endpoint.clone();
        async move {
            let addresses = self.resolve(&endpoint).await?;
            tracing::debug!(%endpoint, count = addresses.len(), "gateway resolved");
            Ok(GatewayClient::new(endpoint, addresses, self.connect_timeout))
        }
    }
}
