//! Upload handler service.
//!
//! Validates the submitted filename, writes the raw bytes, runs extraction on
//! Tokio's blocking pool, and persists the outcome. Extraction problems end up
//! in the stored record; only validation, storage, and persistence failures
//! are returned as errors.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info};

use crate::domain::ports::{
    DocumentPersistenceError, DocumentRepository, DocumentUploadCommand, DocumentsQuery,
    TextExtractor, UploadRequest, UploadStore, UploadStoreError,
};
use crate::domain::{
    Error, ExtractedDocument, ExtractionOutcome, NewDocument, StoredFilename, TraceId,
    UploadPolicy, UploadValidationError,
};

/// Parameter object bundling the driven ports used by [`UploadService`].
#[derive(Clone)]
pub struct UploadServicePorts {
    pub store: Arc<dyn UploadStore>,
    pub extractor: Arc<dyn TextExtractor>,
    pub documents: Arc<dyn DocumentRepository>,
    pub clock: Arc<dyn Clock>,
}

/// Service implementing [`DocumentUploadCommand`] and [`DocumentsQuery`].
#[derive(Clone)]
pub struct UploadService {
    policy: UploadPolicy,
    store: Arc<dyn UploadStore>,
    extractor: Arc<dyn TextExtractor>,
    documents: Arc<dyn DocumentRepository>,
    clock: Arc<dyn Clock>,
}

impl UploadService {
    /// Create a service enforcing `policy` over the given ports.
    pub fn new(policy: UploadPolicy, ports: UploadServicePorts) -> Self {
        let UploadServicePorts {
            store,
            extractor,
            documents,
            clock,
        } = ports;
        Self {
            policy,
            store,
            extractor,
            documents,
            clock,
        }
    }

    async fn store_and_extract(
        &self,
        filename: StoredFilename,
        bytes: Vec<u8>,
    ) -> Result<ExtractionOutcome, Error> {
        let store = Arc::clone(&self.store);
        let extractor = Arc::clone(&self.extractor);
        let trace_id = TraceId::current();

        let joined = tokio::task::spawn_blocking(move || {
            TraceId::sync_scope(trace_id, || {
                store.store(&filename, &bytes)?;
                Ok::<_, UploadStoreError>(extractor.extract(&bytes))
            })
        })
        .await;

        match joined {
            Ok(result) => result.map_err(map_store_error),
            Err(join_error) => {
                error!(error = %join_error, "extraction task did not complete");
                Ok(ExtractionOutcome::failed(format!(
                    "extraction task did not complete: {join_error}"
                )))
            }
        }
    }
}

fn map_validation_error(error: UploadValidationError) -> Error {
    let code = match &error {
        UploadValidationError::MissingFile => "missing_file",
        UploadValidationError::DisallowedExtension { .. } => "disallowed_extension",
        UploadValidationError::UnusableFilename { .. } => "unusable_filename",
    };
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": "file",
        "code": code,
    }))
}

fn map_store_error(error: UploadStoreError) -> Error {
    Error::internal(format!("upload storage failed: {error}"))
}

fn map_persistence_error(error: DocumentPersistenceError) -> Error {
    match error {
        DocumentPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("document repository unavailable: {message}"))
        }
        DocumentPersistenceError::Query { message } => {
            Error::internal(format!("document repository error: {message}"))
        }
    }
}

#[async_trait]
impl DocumentUploadCommand for UploadService {
    async fn upload(&self, request: UploadRequest) -> Result<ExtractedDocument, Error> {
        let UploadRequest {
            uploaded_by,
            filename,
            bytes,
        } = request;
        let stored = self
            .policy
            .validate(&filename)
            .map_err(map_validation_error)?;

        let outcome = self.store_and_extract(stored.clone(), bytes).await?;
        let document = NewDocument {
            filename: stored,
            outcome,
            uploaded_at: self.clock.utc(),
        };
        let id = self
            .documents
            .save(&document)
            .await
            .map_err(map_persistence_error)?;

        info!(
            user_id = %uploaded_by,
            filename = %document.filename,
            outcome = %document.outcome.kind(),
            document_id = %id,
            "stored extracted document"
        );
        Ok(ExtractedDocument::new(id, document))
    }
}

#[async_trait]
impl DocumentsQuery for UploadService {
    async fn list_all(&self) -> Result<Vec<ExtractedDocument>, Error> {
        self.documents
            .list_all()
            .await
            .map_err(map_persistence_error)
    }
}
