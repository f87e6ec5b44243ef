//! In-memory document store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::document::{Document, DocumentFilter};
use crate::domain::foundation::{DocumentId, DomainError, ErrorCode};
use crate::ports::{DocumentMutation, DocumentRepository};

#[derive(Clone, Default)]
pub struct InMemoryDocumentRepository {
    documents: Arc<RwLock<HashMap<DocumentId, Document>>>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn create(&self, document: &Document) -> Result<(), DomainError> {
        let mut documents = self.documents.write().await;
        if documents.contains_key(document.id()) {
            return Err(DomainError::validation(
                "id",
                format!("Document {} already exists", document.id()),
            ));
        }
        documents.insert(*document.id(), document.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DomainError> {
        Ok(self.documents.read().await.get(id).cloned())
    }

    async fn mutate(
        &self,
        id: &DocumentId,
        mutation: DocumentMutation,
    ) -> Result<Document, DomainError> {
        let mut documents = self.documents.write().await;
        let stored = documents
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(ErrorCode::DocumentNotFound, "document", id))?;

        // Work on a copy so a failing mutation leaves nothing half-applied.
        let mut draft = stored.clone();
        mutation(&mut draft)?;
        *stored = draft.clone();
        Ok(draft)
    }

    async fn list(&self, filter: &DocumentFilter) -> Result<Vec<Document>, DomainError> {
        let mut matching: Vec<Document> = self
            .documents
            .read()
            .await
            .values()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.updated_at().cmp(a.updated_at()));
        Ok(matching)
    }
}
