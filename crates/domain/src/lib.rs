//! # domohub-domain
//!
//! Pure domain model for the domohub home automation controller.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Environments** (named groupings such as rooms, identified by a small integer)
//! - Define **Gateways** (network endpoints of the physical controllers)
//! - Define **Domotic records** (lights, automations, devices, IP cameras,
//!   temperature sensors, scenarios) sharing one ownership shape
//! - Contain all invariant enforcement and construction-time validation
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod record;
pub mod time;

pub mod automation;
pub mod device;
pub mod environment;
pub mod gateway;
pub mod ipcam;
pub mod light;
pub mod scenario;
pub mod temperature;
