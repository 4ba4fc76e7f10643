use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{DocumentPersistenceError, DocumentRepository};
use crate::domain::{DocumentId, ExtractedDocument, NewDocument};

/// Process-local [`DocumentRepository`] that assigns ids from 1 upwards.
#[derive(Debug, Default)]
pub struct InMemoryDocumentRepository {
    documents: Mutex<Vec<ExtractedDocument>>,
}

impl InMemoryDocumentRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> DocumentPersistenceError {
    DocumentPersistenceError::connection("document store lock poisoned")
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn save(&self, document: &NewDocument) -> Result<DocumentId, DocumentPersistenceError> {
        let mut documents = self.documents.lock().map_err(|_| poisoned())?;
        let next = i64::try_from(documents.len())
            .map_err(|_| DocumentPersistenceError::query("document id space exhausted"))?
            + 1;
        let id = DocumentId::new(next);
        documents.push(ExtractedDocument::new(id, document.clone()));
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<ExtractedDocument>, DocumentPersistenceError> {
        let documents = self.documents.lock().map_err(|_| poisoned())?;
        Ok(documents.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExtractionOutcome, StoredFilename};
    use chrono::Utc;

    fn new_document(name: &str) -> NewDocument {
        NewDocument {
            filename: StoredFilename::from_stored(name),
            outcome: ExtractionOutcome::Empty,
            uploaded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn lists_in_insertion_order_with_increasing_ids() {
        let repo = InMemoryDocumentRepository::new();
        let first = repo.save(&new_document("b.pdf")).await.expect("save");
        let second = repo.save(&new_document("a.pdf")).await.expect("save");
        assert!(first < second);

        let names: Vec<String> = repo
            .list_all()
            .await
            .expect("list")
            .iter()
            .map(|doc| doc.filename().to_string())
            .collect();
        assert_eq!(names, vec!["b.pdf", "a.pdf"]);
    }
}
