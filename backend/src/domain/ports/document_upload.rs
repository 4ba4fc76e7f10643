//! Driving ports for uploading documents and reading extraction results.

use async_trait::async_trait;

use crate::domain::{Error, ExtractedDocument, UserId};

/// One submitted file.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Authenticated uploader; logged, not stored with the record.
    pub uploaded_by: UserId,
    /// Filename as sent by the client.
    pub filename: String,
    /// Complete file contents.
    pub bytes: Vec<u8>,
}

/// Use-case port for the upload handler.
#[async_trait]
pub trait DocumentUploadCommand: Send + Sync {
    /// Validate, store, extract, and persist one upload.
    ///
    /// Extraction problems are part of the returned record, not errors.
    async fn upload(&self, request: UploadRequest) -> Result<ExtractedDocument, Error>;
}

/// Read side of the document record store.
#[async_trait]
pub trait DocumentsQuery: Send + Sync {
    /// All stored records in insertion order.
    async fn list_all(&self) -> Result<Vec<ExtractedDocument>, Error>;
}
