//! # eventhub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `eventhub-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Create the `users`, `events` and `registrations` tables idempotently
//! - Map between domain types and database rows
//! - Enforce integrity rules the schema alone does not guarantee
//!   (event ownership, one registration per user and event)
//!
//! ## Dependency rule
//! Depends on `eventhub-app` (for port traits) and `eventhub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod event_repo;
pub mod pool;
pub mod registration_repo;
pub mod schema;
mod timestamp;
pub mod user_repo;

pub use error::StorageError;
pub use event_repo::SqliteEventRepository;
pub use pool::{Config, Database};
pub use registration_repo::SqliteRegistrationRepository;
pub use user_repo::SqliteUserRepository;
