//! CreateDocumentHandler - register a new document.

use std::sync::Arc;

use crate::domain::document::{Document, DocumentError};
use crate::domain::foundation::{Capability, CommandMetadata, DocumentId};
use crate::ports::{DocumentRepository, UserDirectory};

#[derive(Debug, Clone)]
pub struct CreateDocumentCommand {
    pub title: String,
    pub content: String,
}

/// Only actors who may publish directly can create documents.
pub struct CreateDocumentHandler {
    documents: Arc<dyn DocumentRepository>,
    directory: Arc<dyn UserDirectory>,
}

impl CreateDocumentHandler {
    pub fn new(documents: Arc<dyn DocumentRepository>, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            documents,
            directory,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateDocumentCommand,
        metadata: CommandMetadata,
    ) -> Result<Document, DocumentError> {
        let actor = self.directory.resolve_actor(&metadata.user_id).await?;
        actor.require(Capability::DirectApply)?;

        let document = Document::new(DocumentId::new(), cmd.title, actor.id.clone(), cmd.content)?;
        self.documents.create(&document).await?;

        tracing::info!(
            correlation_id = %metadata.correlation_id(),
            document_id = %document.id(),
            author_id = %actor.id,
            "document created"
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{as_user, user, World};

    fn handler(w: &World) -> CreateDocumentHandler {
        CreateDocumentHandler::new(w.documents.clone(), w.directory.clone())
    }

    fn cmd(title: &str) -> CreateDocumentCommand {
        CreateDocumentCommand {
            title: title.to_string(),
            content: "# Hello".to_string(),
        }
    }

    #[tokio::test]
    async fn admin_creates_document_without_history() {
        let w = World::new();
        let doc = handler(&w).handle(cmd("Guide"), as_user("admin")).await.unwrap();

        assert_eq!(doc.author(), &user("admin"));
        assert!(doc.versions().is_empty());
        assert_eq!(w.content_of(doc.id()).await.content(), "# Hello");
    }

    #[tokio::test]
    async fn editor_cannot_create() {
        let w = World::new();
        let err = handler(&w).handle(cmd("Guide"), as_user("ed")).await.unwrap_err();
        assert!(matches!(err, DocumentError::Forbidden(_)));
        assert_eq!(w.documents.len().await, 0);
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let w = World::new();
        let err = handler(&w).handle(cmd("  "), as_user("admin")).await.unwrap_err();
        match err {
            DocumentError::ValidationFailed { field, .. } => assert_eq!(field, "title"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
