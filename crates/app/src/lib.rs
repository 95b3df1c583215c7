//! # domohub-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `Repository` / `DomoticRepository`: generic CRUD over any record type
//!   - `EnvironmentRepository`: id sequence and cascading delete
//!   - `PreferenceStore`: first-run and version bookkeeping
//!   - `ClientFactory`: builds protocol clients from gateway endpoints
//! - Own the process-wide [`client_cache::GatewayClientCache`]
//! - Define **driving/inbound ports** as use-case structs:
//!   - `EnvironmentService`, `GatewayService`, `DomoticService`
//!   - `Bootstrap`: first-run / upgrade hook
//!
//! ## Dependency rule
//! Depends on `domohub-domain` only (plus `tokio::sync` / `tokio::time`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod client_cache;
pub mod ports;
pub mod services;

#[cfg(test)]
mod testing;
