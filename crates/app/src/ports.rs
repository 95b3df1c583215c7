//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod client_factory;
pub mod environment_repo;
pub mod preferences;
pub mod repository;

pub use client_factory::ClientFactory;
pub use environment_repo::EnvironmentRepository;
pub use preferences::PreferenceStore;
pub use repository::{DomoticRepository, Repository, exactly_one};
