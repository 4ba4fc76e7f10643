//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories are thin translators between the row structs in `models.rs`
//! and domain types; no business rules live here. Connections come from a
//! `bb8` pool through `diesel-async`, and every Diesel failure is classified
//! into the owning port's error enum.
//!
//! ```ignore
//! use docvault::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/docvault")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_document_repository;
mod diesel_error_mapping;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_document_repository::DieselDocumentRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, apply_migrations_logged, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
