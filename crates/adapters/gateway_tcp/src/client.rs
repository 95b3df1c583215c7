//! Client handle for one gateway.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpStream;

use domohub_domain::error::DomoHubError;
use domohub_domain::gateway::GatewayEndpoint;

use crate::error::TcpClientError;

/// A resolved gateway, ready to open sessions.
///
/// Built by [`TcpClientFactory`](crate::TcpClientFactory) and shared through
/// the client cache; holds no open socket itself.
#[derive(Debug)]
pub struct GatewayClient {
    endpoint: GatewayEndpoint,
    addresses: Vec<SocketAddr>,
    connect_timeout: Duration,
}

impl GatewayClient {
    pub(crate) fn new(
        endpoint: GatewayEndpoint,
        addresses: Vec<SocketAddr>,
        connect_timeout: Duration,
    ) -> Self {
        Self {
            endpoint,
            addresses,
            connect_timeout,
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &GatewayEndpoint {
        &self.endpoint
    }

    /// Addresses the endpoint resolved to, in resolver order.
    #[must_use]
    pub fn addresses(&self) -> &[SocketAddr] {
        &self.addresses
    }

    /// Open a TCP session to the first address accepting a connection.
    ///
    /// # Errors
    ///
    /// Returns [`DomoHubError::Timeout`] if no connection is established in
    /// time, or [`DomoHubError::Client`] if every address refused.
    #[tracing::instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn open_session(&self) -> Result<TcpStream, DomoHubError> {
        let stream = tokio::time::timeout(self.connect_timeout, self.connect_any())
            .await
            .map_err(|_| TcpClientError::Timeout {
                operation: "gateway connection",
                after: self.connect_timeout,
            })??;

        if let Err(err) = stream.set_nodelay(true) {
            tracing::warn!(error = %err, "set TCP_NODELAY failed");
        }
        Ok(stream)
    }

    async fn connect_any(&self) -> Result<TcpStream, TcpClientError> {
        let mut last = None;
        for &addr in &self.addresses {
            match TcpStream::connect(addr).await {
                Ok(stream) => {
                    tracing::debug!(%addr, "session opened");
                    return Ok(stream);
                }
                Err(source) => {
                    tracing::debug!(%addr, error = %source, "connection attempt failed");
                    last = Some(TcpClientError::Connect { addr, source });
                }
            }
        }
        Err(last.unwrap_or_else(|| TcpClientError::NoAddress {
            endpoint: self.endpoint.to_string(),
        }))
    }
}
