//! GetDocumentHandler - current content plus version history.

use std::sync::Arc;

use crate::domain::document::{Document, DocumentError};
use crate::domain::foundation::{Capability, CommandMetadata, DocumentId};
use crate::ports::{DocumentRepository, UserDirectory};

#[derive(Debug, Clone)]
pub struct GetDocumentQuery {
    pub document_id: DocumentId,
}

pub struct GetDocumentHandler {
    documents: Arc<dyn DocumentRepository>,
    directory: Arc<dyn UserDirectory>,
}

impl GetDocumentHandler {
    pub fn new(documents: Arc<dyn DocumentRepository>, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            documents,
            directory,
        }
    }

    pub async fn handle(
        &self,
        query: GetDocumentQuery,
        metadata: CommandMetadata,
    ) -> Result<Document, DocumentError> {
        let actor = self.directory.resolve_actor(&metadata.user_id).await?;
        actor.require(Capability::View)?;

        self.documents
            .find_by_id(&query.document_id)
            .await?
            .ok_or(DocumentError::NotFound(query.document_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{as_user, World};

    #[tokio::test]
    async fn viewer_reads_document() {
        let w = World::new();
        let id = w.document("hello").await;
        let handler = GetDocumentHandler::new(w.documents.clone(), w.directory.clone());

        let doc = handler
            .handle(GetDocumentQuery { document_id: id }, as_user("vi"))
            .await
            .unwrap();
        assert_eq!(doc.content(), "hello");
    }

    #[tokio::test]
    async fn unknown_user_is_forbidden_and_missing_is_not_found() {
        let w = World::new();
        let id = w.document("hello").await;
        let handler = GetDocumentHandler::new(w.documents.clone(), w.directory.clone());

        let err = handler
            .handle(GetDocumentQuery { document_id: id }, as_user("ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::Forbidden(_)));

        let missing = DocumentId::new();
        let err = handler
            .handle(GetDocumentQuery { document_id: missing }, as_user("vi"))
            .await
            .unwrap_err();
        assert_eq!(err, DocumentError::NotFound(missing));
    }
}
