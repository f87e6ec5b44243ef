//! Shared in-memory wiring for handler tests.

use async_trait::async_trait;
use std::sync::Arc;

use crate::adapters::memory::{
    InMemoryDocumentRepository, InMemoryNotificationRepository, InMemoryProposalRepository,
    InMemoryUserDirectory,
};
use crate::adapters::websocket::InMemoryConnectionRegistry;
use crate::application::{DocumentLocks, NotificationDispatcher};
use crate::domain::document::{Document, DocumentFilter};
use crate::domain::foundation::{CommandMetadata, DocumentId, DomainError, ProposalId, Role, UserId};
use crate::domain::proposal::{EditProposal, ProposalStatus, ReviewDecision};
use crate::ports::{DocumentMutation, DocumentRepository, ProposalRepository, UserRecord};

pub struct World {
    pub documents: Arc<InMemoryDocumentRepository>,
    pub proposals: Arc<InMemoryProposalRepository>,
    pub notifications: Arc<InMemoryNotificationRepository>,
    pub directory: Arc<InMemoryUserDirectory>,
    pub registry: Arc<InMemoryConnectionRegistry>,
    pub locks: Arc<DocumentLocks>,
    pub dispatcher: NotificationDispatcher,
}

pub fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

pub fn as_user(id: &str) -> CommandMetadata {
    CommandMetadata::new(user(id)).with_source("test")
}

impl World {
    /// admin (admin), ed + ed2 (editors), vi (viewer).
    pub fn new() -> Self {
        let directory = Arc::new(InMemoryUserDirectory::from_records([
            UserRecord::new(user("admin"), "Admin", Role::Admin),
            UserRecord::new(user("ed"), "Editor", Role::Editor),
            UserRecord::new(user("ed2"), "Second Editor", Role::Editor),
            UserRecord::new(user("vi"), "Viewer", Role::Viewer),
        ]));
        let notifications = Arc::new(InMemoryNotificationRepository::new());
        let registry = Arc::new(InMemoryConnectionRegistry::with_default_capacity());
        let dispatcher =
            NotificationDispatcher::new(notifications.clone(), registry.clone(), directory.clone());
        Self {
            documents: Arc::new(InMemoryDocumentRepository::new()),
            proposals: Arc::new(InMemoryProposalRepository::new()),
            notifications,
            directory,
            registry,
            locks: Arc::new(DocumentLocks::new()),
            dispatcher,
        }
    }

    pub async fn document(&self, content: &str) -> DocumentId {
        let doc = Document::new(DocumentId::new(), "Handbook", user("admin"), content).unwrap();
        self.documents.create(&doc).await.unwrap();
        *doc.id()
    }

    pub async fn content_of(&self, id: &DocumentId) -> Document {
        self.documents.find_by_id(id).await.unwrap().unwrap()
    }
}

/// Document store whose `mutate` always fails with a database error.
pub struct BrokenMutations(pub Arc<InMemoryDocumentRepository>);

#[async_trait]
impl DocumentRepository for BrokenMutations {
    async fn create(&self, document: &Document) -> Result<(), DomainError> {
        self.0.create(document).await
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DomainError> {
        self.0.find_by_id(id).await
    }

    async fn mutate(
        &self,
        _id: &DocumentId,
        _mutation: DocumentMutation,
    ) -> Result<Document, DomainError> {
        Err(DomainError::database("Failed to update document", "connection reset"))
    }

    async fn list(&self, filter: &DocumentFilter) -> Result<Vec<Document>, DomainError> {
        self.0.list(filter).await
    }
}

/// Proposal store whose `create` always fails with a database error.
pub struct BrokenCreates(pub Arc<InMemoryProposalRepository>);

#[async_trait]
impl ProposalRepository for BrokenCreates {
    async fn create(&self, _proposal: &EditProposal) -> Result<(), DomainError> {
        Err(DomainError::database("Failed to insert proposal", "connection reset"))
    }

    async fn find_by_id(&self, id: &ProposalId) -> Result<Option<EditProposal>, DomainError> {
        self.0.find_by_id(id).await
    }

    async fn list_by_status(
        &self,
        status: ProposalStatus,
    ) -> Result<Vec<EditProposal>, DomainError> {
        self.0.list_by_status(status).await
    }

    async fn list_by_proposer(&self, proposer: &UserId) -> Result<Vec<EditProposal>, DomainError> {
        self.0.list_by_proposer(proposer).await
    }

    async fn list_all(&self) -> Result<Vec<EditProposal>, DomainError> {
        self.0.list_all().await
    }

    async fn transition(
        &self,
        id: &ProposalId,
        target: ProposalStatus,
        decision: ReviewDecision,
    ) -> Result<EditProposal, DomainError> {
        self.0.transition(id, target, decision).await
    }

    async fn reopen(
        &self,
        id: &ProposalId,
        from: ProposalStatus,
    ) -> Result<EditProposal, DomainError> {
        self.0.reopen(id, from).await
    }

    async fn remove(&self, id: &ProposalId) -> Result<(), DomainError> {
        self.0.remove(id).await
    }
}
