//! Port abstraction for extracted-document persistence.
use async_trait::async_trait;

use crate::domain::{DocumentId, ExtractedDocument, NewDocument};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by document repository adapters.
    pub enum DocumentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "document repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "document repository query failed: {message}",
    }
}

/// Append-only store of extraction results.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Persist a record and return its assigned identifier.
    async fn save(&self, document: &NewDocument) -> Result<DocumentId, DocumentPersistenceError>;

    /// Every stored record, in insertion order.
    async fn list_all(&self) -> Result<Vec<ExtractedDocument>, DocumentPersistenceError>;
}
