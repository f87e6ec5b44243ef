//! GetProposalHandler - a single proposal with its line diff.

use std::sync::Arc;

use crate::domain::diff::{DiffEngine, DiffLine, DiffStats};
use crate::domain::foundation::{Capability, CommandMetadata, ProposalId};
use crate::domain::proposal::{EditProposal, ProposalError};
use crate::ports::{ProposalRepository, UserDirectory};

use super::find_proposal;

#[derive(Debug, Clone)]
pub struct GetProposalQuery {
    pub proposal_id: ProposalId,
}

#[derive(Debug, Clone)]
pub struct ProposalView {
    pub proposal: EditProposal,
    pub diff: Vec<DiffLine>,
    pub stats: DiffStats,
}

/// Visible to reviewers and to the proposer.
pub struct GetProposalHandler {
    proposals: Arc<dyn ProposalRepository>,
    directory: Arc<dyn UserDirectory>,
    engine: DiffEngine,
}

impl GetProposalHandler {
    pub fn new(
        proposals: Arc<dyn ProposalRepository>,
        directory: Arc<dyn UserDirectory>,
        engine: DiffEngine,
    ) -> Self {
        Self {
            proposals,
            directory,
            engine,
        }
    }

    pub async fn handle(
        &self,
        query: GetProposalQuery,
        metadata: CommandMetadata,
    ) -> Result<ProposalView, ProposalError> {
        let actor = self.directory.resolve_actor(&metadata.user_id).await?;
        let proposal = find_proposal(self.proposals.as_ref(), &query.proposal_id).await?;

        if !actor.can(Capability::Approve) && !proposal.is_proposed_by(&actor.id) {
            return Err(ProposalError::forbidden(format!(
                "{} cannot view proposal {}",
                actor.id, query.proposal_id
            )));
        }

        let diff = proposal.diff(&self.engine);
        let stats = DiffStats::from_lines(&diff);
        Ok(ProposalView {
            proposal,
            diff,
            stats,
        })
    }
}
