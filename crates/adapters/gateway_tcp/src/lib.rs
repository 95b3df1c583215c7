//! # domohub-adapter-gateway-tcp
//!
//! Protocol-client factory for home-automation gateways.
//!
//! ## Responsibilities
//! - Implement the `ClientFactory` port defined in `domohub-app::ports`
//! - Resolve a gateway's `host:port` within a bounded time
//! - Open TCP sessions to the resolved addresses on demand
//!
//! Command framing is not handled here; callers receive a raw stream.
//!
//! ## Dependency rule
//! Depends on `domohub-app` (for port traits) and `domohub-domain` (for domain types).

pub mod client;
pub mod error;
pub mod factory;

pub use client::GatewayClient;
pub use error::TcpClientError;
pub use factory::TcpClientFactory;
