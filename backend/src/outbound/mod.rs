//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: process-local repositories for database-less runs
//! - **crypto**: argon2id password hashing
//! - **pdf**: text extraction via `pdf-extract`
//! - **storage**: raw upload files via `cap-std`
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod crypto;
pub mod memory;
pub mod pdf;
pub mod persistence;
pub mod storage;
