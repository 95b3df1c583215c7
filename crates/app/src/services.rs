//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod bootstrap;
pub mod domotic_service;
pub mod environment_service;
pub mod gateway_service;
