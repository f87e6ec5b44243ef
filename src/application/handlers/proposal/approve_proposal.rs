//! ApproveProposalHandler - accept a pending proposal and publish it.

use std::sync::Arc;

use crate::application::{DocumentLocks, NotificationDispatcher, NotificationDraft};
use crate::domain::document::Document;
use crate::domain::foundation::{
    Capability, CommandMetadata, DomainError, ProposalId, RoleGroup, Timestamp,
};
use crate::domain::notification::{DispatchOptions, NotificationKind};
use crate::domain::proposal::{EditProposal, ProposalError, ProposalStatus, ReviewDecision};
use crate::ports::{DocumentRepository, ProposalRepository, UserDirectory};

use super::{display_name, find_proposal, load_reviewable};

#[derive(Debug, Clone)]
pub struct ApproveProposalCommand {
    pub proposal_id: ProposalId,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApproveProposalResult {
    pub proposal: EditProposal,
    pub document: Document,
}

pub struct ApproveProposalHandler {
    documents: Arc<dyn DocumentRepository>,
    proposals: Arc<dyn ProposalRepository>,
    directory: Arc<dyn UserDirectory>,
    locks: Arc<DocumentLocks>,
    dispatcher: NotificationDispatcher,
}

impl ApproveProposalHandler {
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

    /// Approves the proposal and replaces the document content with the
    /// proposed text. The replaced content becomes a version entry.
    ///
    /// Notifications go out after the document lock is released.
    pub async fn handle(
        &self,
        cmd: ApproveProposalCommand,
        metadata: CommandMetadata,
    ) -> Result<ApproveProposalResult, ProposalError> {
        let actor = self.directory.resolve_actor(&metadata.user_id).await?;
        actor.require(Capability::Approve)?;

        let document_id = *find_proposal(self.proposals.as_ref(), &cmd.proposal_id)
            .await?
            .document_id();

        let result = {
            let _guard = self.locks.acquire(&document_id).await;
            load_reviewable(self.proposals.as_ref(), self.documents.as_ref(), &cmd.proposal_id)
                .await?;

            let now = Timestamp::now();
            let decision = ReviewDecision::new(actor.id.clone(), cmd.notes, now);
            let proposal = self
                .proposals
                .transition(&cmd.proposal_id, ProposalStatus::Approved, decision)
                .await?;

            let content = proposal.proposed_content().to_string();
            let editor = actor.id.clone();
            let applied = self
                .documents
                .mutate(
                    &document_id,
                    Box::new(move |doc: &mut Document| -> Result<(), DomainError> {
                        doc.apply(content, editor, now);
                        Ok(())
                    }),
                )
                .await;
            match applied {
                Ok(document) => ApproveProposalResult { proposal, document },
                Err(err) => {
                    self.roll_back(&cmd.proposal_id, &err).await;
                    return Err(err.into());
                }
            }
        };

        tracing::info!(
            correlation_id = %metadata.correlation_id(),
            proposal_id = %cmd.proposal_id,
            document_id = %document_id,
            reviewer_id = %actor.id,
            versions = result.document.version_count(),
            "proposal approved"
        );

        self.announce(&result).await;
        Ok(result)
    }

    /// Returns the proposal to `pending` so the approval can be retried.
    async fn roll_back(&self, proposal_id: &ProposalId, cause: &DomainError) {
        tracing::warn!(
            proposal_id = %proposal_id,
            error = %cause,
            "document update failed, reopening proposal"
        );
        if let Err(e) = self
            .proposals
            .reopen(proposal_id, ProposalStatus::Approved)
            .await
        {
            tracing::error!(
                proposal_id = %proposal_id,
                error = %e,
                "failed to reopen proposal after document update failure"
            );
        }
    }

    async fn announce(&self, result: &ApproveProposalResult) {
        let proposal = &result.proposal;
        let reviewer = proposal.reviewer_id().cloned();
        let reviewer_name = match &reviewer {
            Some(id) => display_name(self.directory.as_ref(), id).await,
            None => String::from("A reviewer"),
        };
        let mut options = DispatchOptions::new()
            .document(*proposal.document_id())
            .proposal(*proposal.id());
        if let Some(id) = reviewer {
            options = options.actor(id);
        }

        let approved = NotificationDraft::new(
            NotificationKind::Approved,
            "Your edit was approved",
            format!(
                "{} approved your changes to \"{}\"",
                reviewer_name,
                result.document.title()
            ),
        )
        .with_options(options.clone());
        self.dispatcher.notify(proposal.proposer_id(), approved).await;

        let published = NotificationDraft::new(
            NotificationKind::Published,
            "Document updated",
            format!("A new version of \"{}\" is available", result.document.title()),
        )
        .with_options(options);
        self.dispatcher.fan_out(RoleGroup::Viewers, published).await;
    }
}
