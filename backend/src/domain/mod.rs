//! Domain primitives, services, and ports.
//!
//! Purpose: define strongly typed entities for accounts and extracted
//! documents plus the services that orchestrate them through ports. Nothing
//! here knows about HTTP, SQL, or the filesystem.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, UserAccount and value types: the credential store's entities.
//! - ExtractionOutcome, ExtractedDocument: the record store's entities.
//! - AccountService, UploadService: use-case implementations.

pub mod accounts;
pub mod auth;
pub mod document;
pub mod error;
pub mod extraction;
pub mod ports;
pub mod trace_id;
pub mod uploads;
pub mod user;

pub use self::accounts::{AccountService, DUPLICATE_EMAIL};
pub use self::auth::{CredentialsValidationError, LoginCredentials, Registration};
pub use self::document::{
    DocumentId, ExtractedDocument, FILENAME_MAX, NewDocument, StoredFilename, UploadPolicy,
    UploadValidationError,
};
pub use self::error::{Error, ErrorCode};
pub use self::extraction::{
    ExtractionOutcome, FAILURE_PREFIX, NO_TEXT_SENTINEL, OutcomeKind, UnknownOutcomeKind,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::uploads::{UploadService, UploadServicePorts};
pub use self::user::{
    DisplayName, EMAIL_MAX, EmailAddress, NAME_MAX, PasswordHash, User, UserAccount, UserId,
    UserValidationError,
};
