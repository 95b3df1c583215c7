//! Gateway: the network endpoint of a physical home-automation controller.

use serde::{Deserialize, Serialize};

use crate::error::{DomoHubError, ValidationError};
use crate::id::GatewayId;
use crate::record::Record;

/// Port the controllers listen on out of the box.
pub const DEFAULT_PORT: u16 = 20000;

/// A configured controller reachable at `host:port`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gateway {
    pub id: GatewayId,
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
}

/// Connection settings a protocol client is built from.
///
/// Also serves as the fingerprint the client cache compares to detect that a
/// cached client no longer matches its gateway record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GatewayEndpoint {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
}

impl Gateway {
    /// Create a gateway with a freshly generated id.
    ///
    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] when `host` is blank or `port` is zero.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        password: Option<String>,
    ) -> Result<Self, DomoHubError> {
        Self::with_id(GatewayId::new(), host, port, password)
    }

    /// Create a gateway reusing an existing id (update flows).
    ///
    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] when `host` is blank or `port` is zero.
    pub fn with_id(
        id: GatewayId,
        host: impl Into<String>,
        port: u16,
        password: Option<String>,
    ) -> Result<Self, DomoHubError> {
        let gateway = Self {
            id,
            host: host.into(),
            port,
            password: password.filter(|p| !p.is_empty()),
        };
        gateway.validate()?;
        Ok(gateway)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] when `host` is blank or `port` is zero.
    pub fn validate(&self) -> Result<(), DomoHubError> {
        if self.host.trim().is_empty() {
            return Err(ValidationError::EmptyHost.into());
        }
        if self.port == 0 {
            return Err(ValidationError::InvalidPort.into());
        }
        Ok(())
    }

    #[must_use]
    pub fn endpoint(&self) -> GatewayEndpoint {
        GatewayEndpoint {
            host: self.host.clone(),
            port: self.port,
            password: self.password.clone(),
        }
    }
}

impl Record for Gateway {
    type Id = GatewayId;

    const KIND: &'static str = "Gateway";

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl std::fmt::Display for GatewayEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
