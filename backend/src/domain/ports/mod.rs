//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, hasher, extractor, upload store) expose
//! strongly typed errors so adapters map their failures into predictable
//! variants. Driving ports return the domain [`crate::domain::Error`].

mod macros;
pub(crate) use macros::define_port_error;

mod document_repository;
mod document_upload;
mod login_service;
mod password_hasher;
mod text_extractor;
mod upload_store;
mod user_repository;

#[cfg(test)]
pub use document_repository::MockDocumentRepository;
pub use document_repository::{DocumentPersistenceError, DocumentRepository};
pub use document_upload::{DocumentUploadCommand, DocumentsQuery, UploadRequest};
pub use login_service::{LoginService, RegistrationService};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use text_extractor::MockTextExtractor;
pub use text_extractor::TextExtractor;
#[cfg(test)]
pub use upload_store::MockUploadStore;
pub use upload_store::{UploadStore, UploadStoreError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
