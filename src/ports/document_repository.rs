//! Document repository port.
//!
//! `mutate` is the only way content changes. Implementations run the closure
//! against the freshest stored state and persist the result as one atomic
//! unit; concurrent mutations of one document are serialised.

use async_trait::async_trait;

use crate::domain::document::{Document, DocumentFilter};
use crate::domain::foundation::{DocumentId, DomainError};

/// Change applied inside the repository's atomic scope.
///
/// Returning an error aborts the mutation and leaves the stored document
/// untouched.
pub type DocumentMutation = Box<dyn FnOnce(&mut Document) -> Result<(), DomainError> + Send>;

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Persist a new document.
    async fn create(&self, document: &Document) -> Result<(), DomainError>;

    /// Find a document by id. Returns `None` if not found.
    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DomainError>;

    /// Atomically load, change and store a document; returns the stored result.
    ///
    /// # Errors
    ///
    /// - `DocumentNotFound` if the document doesn't exist
    /// - whatever the mutation returns, with nothing persisted
    async fn mutate(
        &self,
        id: &DocumentId,
        mutation: DocumentMutation,
    ) -> Result<Document, DomainError>;

    /// Documents matching the filter, most recently updated first.
    async fn list(&self, filter: &DocumentFilter) -> Result<Vec<Document>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn DocumentRepository) {}
    }
}
