//! Notification entity and dispatch options.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::{
    DocumentId, DomainError, NotificationId, ProposalId, Timestamp, UserId,
};

use super::NotificationKind;

/// Optional fields of a dispatch, all defaulting to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchOptions {
    pub actor_id: Option<UserId>,
    pub document_id: Option<DocumentId>,
    pub proposal_id: Option<ProposalId>,
    pub metadata: Map<String, Value>,
}

impl DispatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actor(mut self, actor_id: UserId) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    pub fn document(mut self, document_id: DocumentId) -> Self {
        self.document_id = Some(document_id);
        self
    }

    pub fn proposal(mut self, proposal_id: ProposalId) -> Self {
        self.proposal_id = Some(proposal_id);
        self
    }

    pub fn meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    id: NotificationId,
    recipient_id: UserId,
    kind: NotificationKind,
    actor_id: Option<UserId>,
    document_id: Option<DocumentId>,
    proposal_id: Option<ProposalId>,
    title: String,
    message: String,
    metadata: Map<String, Value>,
    is_read: bool,
    delivered: bool,
    created_at: Timestamp,
}

impl Notification {
    /// Create an unread, undelivered notification.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if title is empty
    pub fn new(
        recipient_id: UserId,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        options: DispatchOptions,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::validation("title", "Title cannot be empty"));
        }

        Ok(Self {
            id: NotificationId::new(),
            recipient_id,
            kind,
            actor_id: options.actor_id,
            document_id: options.document_id,
            proposal_id: options.proposal_id,
            title,
            message: message.into(),
            metadata: options.metadata,
            is_read: false,
            delivered: false,
            created_at: Timestamp::now(),
        })
    }

    /// Reconstitute from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: NotificationId,
        recipient_id: UserId,
        kind: NotificationKind,
        options: DispatchOptions,
        title: String,
        message: String,
        is_read: bool,
        delivered: bool,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            recipient_id,
            kind,
            actor_id: options.actor_id,
            document_id: options.document_id,
            proposal_id: options.proposal_id,
            title,
            message,
            metadata: options.metadata,
            is_read,
            delivered,
            created_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &NotificationId {
        &self.id
    }

    pub fn recipient_id(&self) -> &UserId {
        &self.recipient_id
    }

    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    pub fn actor_id(&self) -> Option<&UserId> {
        self.actor_id.as_ref()
    }

    pub fn document_id(&self) -> Option<&DocumentId> {
        self.document_id.as_ref()
    }

    pub fn proposal_id(&self) -> Option<&ProposalId> {
        self.proposal_id.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    pub fn is_read(&self) -> bool {
        self.is_read
    }

    pub fn delivered(&self) -> bool {
        self.delivered
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn belongs_to(&self, user_id: &UserId) -> bool {
        &self.recipient_id == user_id
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    pub fn mark_read(&mut self) {
        self.is_read = true;
    }

    pub fn mark_delivered(&mut self) {
        self.delivered = true;
    }
}
