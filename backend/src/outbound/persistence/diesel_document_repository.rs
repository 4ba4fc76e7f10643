//! PostgreSQL-backed `DocumentRepository` using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{DocumentPersistenceError, DocumentRepository};
use crate::domain::{
    DocumentId, ExtractedDocument, ExtractionOutcome, NewDocument, OutcomeKind, StoredFilename,
};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{ExtractedDataRow, NewExtractedDataRow};
use super::pool::{DbPool, PoolError};
use super::schema::extracted_data;

/// Diesel-backed implementation of the [`DocumentRepository`] port.
#[derive(Clone)]
pub struct DieselDocumentRepository {
    pool: DbPool,
}

impl DieselDocumentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DocumentPersistenceError {
    DocumentPersistenceError::connection(error.message())
}

fn map_diesel_error(error: diesel::result::Error) -> DocumentPersistenceError {
    match classify_diesel_error(&error) {
        DieselFailure::Connection(message) => DocumentPersistenceError::connection(message),
        DieselFailure::Query(message) => DocumentPersistenceError::query(message),
        DieselFailure::UniqueViolation => {
            DocumentPersistenceError::query("unexpected unique violation")
        }
    }
}

fn row_to_document(row: ExtractedDataRow) -> ExtractedDocument {
    let outcome = match row.outcome.parse::<OutcomeKind>() {
        Ok(kind) => ExtractionOutcome::from_parts(kind, row.content),
        Err(err) => {
            // The check constraint makes this unreachable short of manual edits.
            warn!(document_id = row.id, error = %err, "unrecognised outcome tag");
            ExtractionOutcome::failed(err.to_string())
        }
    };
    ExtractedDocument::new(
        DocumentId::new(row.id),
        NewDocument {
            filename: StoredFilename::from_stored(row.filename),
            outcome,
            uploaded_at: row.uploaded_at,
        },
    )
}

#[async_trait]
impl DocumentRepository for DieselDocumentRepository {
    async fn save(&self, document: &NewDocument) -> Result<DocumentId, DocumentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewExtractedDataRow {
            filename: document.filename.as_ref(),
            outcome: document.outcome.kind().as_str(),
            content: document.outcome.content(),
            uploaded_at: document.uploaded_at,
        };

        diesel::insert_into(extracted_data::table)
            .values(&row)
            .returning(extracted_data::id)
            .get_result::<i64>(&mut conn)
            .await
            .map(DocumentId::new)
            .map_err(map_diesel_error)
    }

    async fn list_all(&self) -> Result<Vec<ExtractedDocument>, DocumentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = extracted_data::table
            .order(extracted_data::id.asc())
            .select(ExtractedDataRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_document).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn row(outcome: &str, content: &str) -> ExtractedDataRow {
        ExtractedDataRow {
            id: 3,
            filename: "doc.pdf".to_owned(),
            outcome: outcome.to_owned(),
            content: content.to_owned(),
            uploaded_at: Utc::now(),
        }
    }

    #[rstest]
    #[case("extracted", "Hello", ExtractionOutcome::Extracted("Hello".into()))]
    #[case("empty", "", ExtractionOutcome::Empty)]
    #[case("failed", "bad header", ExtractionOutcome::failed("bad header"))]
    fn rows_rebuild_outcomes(
        #[case] tag: &str,
        #[case] content: &str,
        #[case] expected: ExtractionOutcome,
    ) {
        let document = row_to_document(row(tag, content));
        assert_eq!(document.id(), DocumentId::new(3));
        assert_eq!(document.outcome(), &expected);
    }

    #[rstest]
    fn unknown_tag_degrades_to_failure() {
        let document = row_to_document(row("bogus", "x"));
        assert!(matches!(document.outcome(), ExtractionOutcome::Failed(_)));
    }
}
