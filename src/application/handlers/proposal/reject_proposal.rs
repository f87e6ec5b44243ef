//! RejectProposalHandler - decline a pending proposal.

use std::sync::Arc;

use crate::application::{DocumentLocks, NotificationDispatcher, NotificationDraft};
use crate::domain::foundation::{Capability, CommandMetadata, ProposalId, Timestamp};
use crate::domain::notification::{DispatchOptions, NotificationKind};
use crate::domain::proposal::{EditProposal, ProposalError, ProposalStatus, ReviewDecision};
use crate::ports::{DocumentRepository, ProposalRepository, UserDirectory};

use super::{display_name, find_proposal, load_reviewable};

#[derive(Debug, Clone)]
pub struct RejectProposalCommand {
    pub proposal_id: ProposalId,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RejectProposalResult {
    pub proposal: EditProposal,
}

pub struct RejectProposalHandler {
    documents: Arc<dyn DocumentRepository>,
    proposals: Arc<dyn ProposalRepository>,
    directory: Arc<dyn UserDirectory>,
    locks: Arc<DocumentLocks>,
    dispatcher: NotificationDispatcher,
}

impl RejectProposalHandler {
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
        cmd: RejectProposalCommand,
        metadata: CommandMetadata,
    ) -> Result<RejectProposalResult, ProposalError> {
        let actor = self.directory.resolve_actor(&metadata.user_id).await?;
        actor.require(Capability::Approve)?;

        let document_id = *find_proposal(self.proposals.as_ref(), &cmd.proposal_id)
            .await?
            .document_id();

        let proposal = {
            let _guard = self.locks.acquire(&document_id).await;
            load_reviewable(self.proposals.as_ref(), self.documents.as_ref(), &cmd.proposal_id)
                .await?;
            let decision = ReviewDecision::new(actor.id.clone(), cmd.notes, Timestamp::now());
            self.proposals
                .transition(&cmd.proposal_id, ProposalStatus::Rejected, decision)
                .await?
        };

        tracing::info!(
            correlation_id = %metadata.correlation_id(),
            proposal_id = %cmd.proposal_id,
            document_id = %document_id,
            reviewer_id = %actor.id,
            "proposal rejected"
        );

        let reviewer_name = display_name(self.directory.as_ref(), &actor.id).await;
        let message = match proposal.review_notes() {
            Some(notes) => format!("{} rejected your changes: {}", reviewer_name, notes),
            None => format!("{} rejected your changes", reviewer_name),
        };
        let mut options = DispatchOptions::new()
            .actor(actor.id.clone())
            .document(document_id)
            .proposal(*proposal.id());
        if let Some(notes) = proposal.review_notes() {
            options = options.meta("notes", notes);
        }
        let draft = NotificationDraft::new(NotificationKind::Rejected, "Your edit was rejected", message)
            .with_options(options);
        self.dispatcher.notify(proposal.proposer_id(), draft).await;

        Ok(RejectProposalResult { proposal })
    }
}
