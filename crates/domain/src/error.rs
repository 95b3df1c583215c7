//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`DomoHubError`]
//! via `#[from]`. Adapter failures are boxed into the `Storage` or `Client`
//! variants so the domain never depends on IO crates.

use std::time::Duration;

/// Top-level error returned by every port and service.
#[derive(Debug, thiserror::Error)]
pub enum DomoHubError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("record not found")]
    NotFound(#[from] NotFoundError),

    #[error("integrity violation")]
    IntegrityViolation(#[from] IntegrityError),

    #[error("stale cache entry")]
    StaleCacheEntry(#[from] StaleCacheError),

    #[error("operation timed out")]
    Timeout(#[from] TimeoutError),

    /// The embedded store failed; wraps the original cause.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The protocol-client factory failed; wraps the original cause.
    #[error("gateway client error")]
    Client(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Construction-time invariant failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("location must not be empty")]
    EmptyLocation,

    #[error("host must not be empty")]
    EmptyHost,

    #[error("port must be non-zero")]
    InvalidPort,

    #[error("url must not be empty")]
    EmptyUrl,

    #[error("request must not be empty")]
    EmptyRequest,

    #[error("environment id must be positive")]
    InvalidEnvironmentId,

    #[error("environment id sequence is exhausted")]
    EnvironmentIdsExhausted,
}

/// A point lookup matched zero rows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Primary-key uniqueness was (or would be) broken.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityError {
    #[error("{entity} {id} already exists")]
    DuplicateId { entity: &'static str, id: String },

    #[error("primary key violation: {count} {entity} rows match {id}")]
    MultipleRows {
        entity: &'static str,
        id: String,
        count: usize,
    },
}

/// A cached client was built from gateway configuration that has since changed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cached client for gateway {gateway_id} was built from outdated configuration")]
pub struct StaleCacheError {
    pub gateway_id: String,
}

/// An awaited boundary did not complete in time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} did not complete within {after:?}")]
pub struct TimeoutError {
    pub operation: &'static str,
    pub after: Duration,
}
