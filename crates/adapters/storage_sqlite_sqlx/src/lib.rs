//! # domohub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository ports defined in `domohub-app::ports`
//! - Manage the `SQLite` connection pool lifecycle
//! - Run the embedded migrations
//! - Map between domain records and database rows
//!
//! ## Dependency rule
//! Depends on `domohub-app` (for port traits) and `domohub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod environment_repo;
pub mod error;
pub mod pool;
pub mod preference_store;
pub mod table;
pub mod tables;

pub use environment_repo::SqliteEnvironmentRepository;
pub use pool::{Config, Database};
pub use preference_store::SqlitePreferenceStore;
pub use table::{SqliteRepository, Table};
