//! SubmitProposalHandler - propose new content for a document.
//!
//! Holders of `direct_apply` skip review: the content is applied at once
//! and an already-approved proposal is stored as the audit row.

use std::sync::Arc;

use crate::application::{DocumentLocks, NotificationDispatcher, NotificationDraft};
use crate::domain::document::Document;
use crate::domain::foundation::{
    Capability, CommandMetadata, DocumentId, DomainError, ErrorCode, ProposalId, RoleGroup,
    Timestamp,
};
use crate::domain::notification::{DispatchOptions, NotificationKind};
use crate::domain::proposal::{EditProposal, ProposalError};
use crate::ports::{DocumentRepository, ProposalRepository, UserDirectory};

use super::display_name;

#[derive(Debug, Clone)]
pub struct SubmitProposalCommand {
    pub document_id: DocumentId,
    pub proposed_content: String,
}

#[derive(Debug, Clone)]
pub struct SubmitProposalResult {
    pub proposal: EditProposal,
    /// Set when the content was applied directly.
    pub document: Option<Document>,
}

impl SubmitProposalResult {
    pub fn applied(&self) -> bool {
        self.document.is_some()
    }
}

pub struct SubmitProposalHandler {
    documents: Arc<dyn DocumentRepository>,
    proposals: Arc<dyn ProposalRepository>,
    directory: Arc<dyn UserDirectory>,
    locks: Arc<DocumentLocks>,
    dispatcher: NotificationDispatcher,
}

impl SubmitProposalHandler {
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        proposals: Arc<dyn ProposalRepository>,
        directory: Arc<dyn UserDirectory>,
        locks: Arc<DocumentLocks>,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            documents,
            proposals,
            directory,
            locks,
            dispatcher,
        }
    }

    pub async fn handle(
        &self,
        cmd: SubmitProposalCommand,
        metadata: CommandMetadata,
    ) -> Result<SubmitProposalResult, ProposalError> {
        let actor = self.directory.resolve_actor(&metadata.user_id).await?;
        actor.require(Capability::Propose)?;

        let result = {
            let _guard = self.locks.acquire(&cmd.document_id).await;
            let document = self
                .documents
                .find_by_id(&cmd.document_id)
                .await?
                .ok_or_else(|| {
                    ProposalError::validation(
                        "document_id",
                        format!("Document not found: {}", cmd.document_id),
                    )
                })?;

            if actor.can(Capability::DirectApply) {
                let now = Timestamp::now();
                let proposal = EditProposal::self_approved(
                    cmd.document_id,
                    actor.id.clone(),
                    document.content().to_string(),
                    cmd.proposed_content,
                    now,
                );
                // Audit row first: if it cannot be stored the content stays put.
                self.proposals.create(&proposal).await?;

                let editor = actor.id.clone();
                let content = proposal.proposed_content().to_string();
                let applied = self
                    .documents
                    .mutate(
                        &cmd.document_id,
                        Box::new(move |doc: &mut Document| -> Result<(), DomainError> {
                            doc.apply(content, editor, now);
                            Ok(())
                        }),
                    )
                    .await;
                match applied {
                    Ok(document) => SubmitProposalResult {
                        proposal,
                        document: Some(document),
                    },
                    Err(err) => {
                        self.discard(proposal.id(), &err).await;
                        return Err(unresolved_document(&cmd.document_id, err));
                    }
                }
            } else {
                let proposal = EditProposal::pending(
                    cmd.document_id,
                    actor.id.clone(),
                    document.content().to_string(),
                    cmd.proposed_content,
                );
                self.proposals.create(&proposal).await?;
                SubmitProposalResult {
                    proposal,
                    document: None,
                }
            }
        };

        tracing::info!(
            correlation_id = %metadata.correlation_id(),
            proposal_id = %result.proposal.id(),
            document_id = %cmd.document_id,
            user_id = %actor.id,
            applied = result.applied(),
            "proposal submitted"
        );

        self.announce(&result).await;
        Ok(result)
    }

    async fn discard(&self, proposal_id: &ProposalId, cause: &DomainError) {
        tracing::warn!(
            proposal_id = %proposal_id,
            error = %cause,
            "direct apply failed, removing audit row"
        );
        if let Err(e) = self.proposals.remove(proposal_id).await {
            tracing::error!(
                proposal_id = %proposal_id,
                error = %e,
                "failed to remove audit row after direct apply failure"
            );
        }
    }

    async fn announce(&self, result: &SubmitProposalResult) {
        let proposal = &result.proposal;
        let who = display_name(self.directory.as_ref(), proposal.proposer_id()).await;
        let options = DispatchOptions::new()
            .actor(proposal.proposer_id().clone())
            .document(*proposal.document_id())
            .proposal(*proposal.id());

        match &result.document {
            None => {
                let draft = NotificationDraft::new(
                    NotificationKind::Submitted,
                    "New edit awaiting review",
                    format!("{} proposed changes to a document", who),
                )
                .with_options(options);
                self.dispatcher.fan_out(RoleGroup::Reviewers, draft).await;
            }
            Some(document) => {
                let draft = NotificationDraft::new(
                    NotificationKind::Published,
                    "Document updated",
                    format!("{} published a new version of \"{}\"", who, document.title()),
                )
                .with_options(options);
                self.dispatcher.fan_out(RoleGroup::Viewers, draft).await;
            }
        }
    }
}

fn unresolved_document(id: &DocumentId, err: DomainError) -> ProposalError {
    if err.code == ErrorCode::DocumentNotFound {
        ProposalError::validation("document_id", format!("Document not found: {}", id))
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{
        as_user, user, BrokenCreates, BrokenMutations, World,
    };
    use crate::domain::notification::NotificationKind;
    use crate::domain::proposal::ProposalStatus;

    fn handler(w: &World) -> SubmitProposalHandler {
        SubmitProposalHandler::new(
            w.documents.clone(),
            w.proposals.clone(),
            w.directory.clone(),
            w.locks.clone(),
            w.dispatcher.clone(),
        )
    }

    fn cmd(document_id: DocumentId, content: &str) -> SubmitProposalCommand {
        SubmitProposalCommand {
            document_id,
            proposed_content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn editor_submission_is_pending_with_baseline_snapshot() {
        let w = World::new();
        let doc = w.document("v1").await;

        let result = handler(&w).handle(cmd(doc, "v2"), as_user("ed")).await.unwrap();

        assert!(!result.applied());
        assert_eq!(result.proposal.status(), ProposalStatus::Pending);
        assert_eq!(result.proposal.baseline_content(), "v1");
        assert_eq!(w.content_of(&doc).await.content(), "v1");
    }

    #[tokio::test]
    async fn pending_submission_notifies_reviewers_only() {
        let w = World::new();
        let doc = w.document("v1").await;
        handler(&w).handle(cmd(doc, "v2"), as_user("ed")).await.unwrap();

        let sent = w.notifications.all().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient_id(), &user("admin"));
        assert_eq!(sent[0].kind(), NotificationKind::Submitted);
        assert_eq!(sent[0].document_id(), Some(&doc));
    }

    #[tokio::test]
    async fn direct_apply_updates_document_and_records_approved_row() {
        let w = World::new();
        let doc = w.document("v1").await;

        let result = handler(&w).handle(cmd(doc, "v2"), as_user("admin")).await.unwrap();

        assert!(result.applied());
        let p = &result.proposal;
        assert_eq!(p.status(), ProposalStatus::Approved);
        assert_eq!(p.reviewer_id(), Some(&user("admin")));
        assert_eq!(p.baseline_content(), "v1");

        let stored = w.content_of(&doc).await;
        assert_eq!(stored.content(), "v2");
        assert_eq!(stored.versions().len(), 1);
        assert_eq!(stored.versions()[0].content, "v1");

        let sent = w.notifications.all().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient_id(), &user("vi"));
        assert_eq!(sent[0].kind(), NotificationKind::Published);
    }

    #[tokio::test]
    async fn failed_direct_apply_leaves_no_audit_row() {
        let w = World::new();
        let doc = w.document("v1").await;
        let broken = SubmitProposalHandler::new(
            Arc::new(BrokenMutations(w.documents.clone())),
            w.proposals.clone(),
            w.directory.clone(),
            w.locks.clone(),
            w.dispatcher.clone(),
        );

        let err = broken.handle(cmd(doc, "v2"), as_user("admin")).await.unwrap_err();
        assert!(matches!(err, ProposalError::Infrastructure(_)));
        assert!(w.proposals.list_all().await.unwrap().is_empty());
        assert_eq!(w.content_of(&doc).await.content(), "v1");
        assert_eq!(w.notifications.len().await, 0);
    }

    #[tokio::test]
    async fn failed_audit_row_leaves_content_untouched() {
        let w = World::new();
        let doc = w.document("v1").await;
        let broken = SubmitProposalHandler::new(
            w.documents.clone(),
            Arc::new(BrokenCreates(w.proposals.clone())),
            w.directory.clone(),
            w.locks.clone(),
            w.dispatcher.clone(),
        );

        let err = broken.handle(cmd(doc, "v2"), as_user("admin")).await.unwrap_err();
        assert!(matches!(err, ProposalError::Infrastructure(_)));
        let stored = w.content_of(&doc).await;
        assert_eq!(stored.content(), "v1");
        assert!(stored.versions().is_empty());
        assert_eq!(w.notifications.len().await, 0);
    }

    #[tokio::test]
    async fn viewer_cannot_propose() {
        let w = World::new();
        let doc = w.document("v1").await;
        let err = handler(&w).handle(cmd(doc, "x"), as_user("vi")).await.unwrap_err();
        assert!(matches!(err, ProposalError::Forbidden(_)));
        assert!(w.proposals.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_user_cannot_propose() {
        let w = World::new();
        let doc = w.document("v1").await;
        let err = handler(&w).handle(cmd(doc, "x"), as_user("ghost")).await.unwrap_err();
        assert!(matches!(err, ProposalError::Forbidden(_)));
    }

    #[tokio::test]
    async fn unresolved_document_is_a_validation_error() {
        let w = World::new();
        for who in ["ed", "admin"] {
            let err = handler(&w)
                .handle(cmd(DocumentId::new(), "x"), as_user(who))
                .await
                .unwrap_err();
            match err {
                ProposalError::ValidationFailed { field, .. } => assert_eq!(field, "document_id"),
                other => panic!("unexpected {:?}", other),
            }
        }
        assert!(w.proposals.list_all().await.unwrap().is_empty());
        assert_eq!(w.notifications.len().await, 0);
    }
}
