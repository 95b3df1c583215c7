//! Gateway client error types.

use std::net::SocketAddr;
use std::time::Duration;

use domohub_domain::error::{DomoHubError, TimeoutError};

/// Errors specific to the TCP gateway client.
#[derive(Debug, thiserror::Error)]
pub enum TcpClientError {
    /// Name resolution failed.
    #[error("unable to resolve {endpoint}")]
    Resolve {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    /// Name resolution succeeded but yielded nothing to connect to.
    #[error("no address found for {endpoint}")]
    NoAddress { endpoint: String },

    /// Every resolved address refused the connection; holds the last failure.
    #[error("unable to connect to {addr}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

impl From<TcpClientError> for DomoHubError {
    fn from(err: TcpClientError) -> Self {
        match err {
            TcpClientError::Timeout { operation, after } => {
                Self::Timeout(TimeoutError { operation, after })
            }
            other => Self::Client(Box::new(other)),
        }
    }
}
