//! ListDocumentsHandler - documents matching a filter.

use std::sync::Arc;

use crate::domain::document::{Document, DocumentError, DocumentFilter};
use crate::domain::foundation::{Capability, CommandMetadata};
use crate::ports::{DocumentRepository, UserDirectory};

#[derive(Debug, Clone, Default)]
pub struct ListDocumentsQuery {
    pub filter: DocumentFilter,
}

pub struct ListDocumentsHandler {
    documents: Arc<dyn DocumentRepository>,
    directory: Arc<dyn UserDirectory>,
}

impl ListDocumentsHandler {
    pub fn new(documents: Arc<dyn DocumentRepository>, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            documents,
            directory,
        }
    }

    pub async fn handle(
        &self,
        query: ListDocumentsQuery,
        metadata: CommandMetadata,
    ) -> Result<Vec<Document>, DocumentError> {
        let actor = self.directory.resolve_actor(&metadata.user_id).await?;
        actor.require(Capability::View)?;
        Ok(self.documents.list(&query.filter).await?)
    }
}
