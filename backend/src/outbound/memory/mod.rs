//! In-memory adapters used when no database is configured.
//!
//! Data lives for the lifetime of the process. Each store is guarded by a
//! single mutex, so uniqueness checks and inserts happen atomically.

mod documents;
mod users;

pub use documents::InMemoryDocumentRepository;
pub use users::InMemoryUserRepository;
