//! ListProposalsHandler - proposal listings, newest first.

use std::sync::Arc;

use crate::domain::foundation::{Capability, CommandMetadata};
use crate::domain::proposal::{EditProposal, ProposalError, ProposalStatus};
use crate::ports::{ProposalRepository, UserDirectory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalScope {
    /// Review queue. Requires `approve`.
    Status(ProposalStatus),
    /// Every proposal. Requires `approve`.
    All,
    /// The caller's own submissions.
    Mine,
}

#[derive(Debug, Clone)]
pub struct ListProposalsQuery {
    pub scope: ProposalScope,
}

pub struct ListProposalsHandler {
    proposals: Arc<dyn ProposalRepository>,
    directory: Arc<dyn UserDirectory>,
}

impl ListProposalsHandler {
    pub fn new(proposals: Arc<dyn ProposalRepository>, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            proposals,
            directory,
        }
    }

    pub async fn handle(
        &self,
        query: ListProposalsQuery,
        metadata: CommandMetadata,
    ) -> Result<Vec<EditProposal>, ProposalError> {
        let actor = self.directory.resolve_actor(&metadata.user_id).await?;
        let proposals = match query.scope {
            ProposalScope::Status(status) => {
                actor.require(Capability::Approve)?;
                self.proposals.list_by_status(status).await?
            }
            ProposalScope::All => {
                actor.require(Capability::Approve)?;
                self.proposals.list_all().await?
            }
            ProposalScope::Mine => {
                actor.require(Capability::Propose)?;
                self.proposals.list_by_proposer(&actor.id).await?
            }
        };
        Ok(proposals)
    }
}
