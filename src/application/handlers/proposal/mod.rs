//! Edit proposal command and query handlers.
//!
//! Commands run their atomic part under the document's lock and trigger
//! notifications only after it is released.

mod approve_proposal;
mod get_proposal;
mod list_proposals;
mod reject_proposal;
mod submit_proposal;

pub use approve_proposal::{ApproveProposalCommand, ApproveProposalHandler, ApproveProposalResult};
pub use get_proposal::{GetProposalHandler, GetProposalQuery, ProposalView};
pub use list_proposals::{ListProposalsHandler, ListProposalsQuery, ProposalScope};
pub use reject_proposal::{RejectProposalCommand, RejectProposalHandler, RejectProposalResult};
pub use submit_proposal::{SubmitProposalCommand, SubmitProposalHandler, SubmitProposalResult};

use crate::domain::foundation::{DocumentId, ProposalId, UserId};
use crate::domain::proposal::{EditProposal, ProposalError};
use crate::ports::{DocumentRepository, ProposalRepository, UserDirectory};

/// Name used in notification text; falls back to the raw id.
async fn display_name(directory: &dyn UserDirectory, user_id: &UserId) -> String {
    match directory.find(user_id).await {
        Ok(Some(record)) => record.display_name,
        _ => user_id.to_string(),
    }
}

/// Re-read a proposal under its document lock and make sure it can still
/// be reviewed.
async fn load_reviewable(
    proposals: &dyn ProposalRepository,
    documents: &dyn DocumentRepository,
    id: &ProposalId,
) -> Result<EditProposal, ProposalError> {
    let proposal = find_proposal(proposals, id).await?;
    if !proposal.status().is_pending() {
        return Err(ProposalError::invalid_state(format!(
            "Proposal {} is already {}",
            id,
            proposal.status()
        )));
    }
    ensure_document(documents, proposal.document_id()).await?;
    Ok(proposal)
}

async fn find_proposal(
    proposals: &dyn ProposalRepository,
    id: &ProposalId,
) -> Result<EditProposal, ProposalError> {
    proposals
        .find_by_id(id)
        .await?
        .ok_or_else(|| ProposalError::not_found(format!("Proposal not found: {}", id)))
}

async fn ensure_document(
    documents: &dyn DocumentRepository,
    id: &DocumentId,
) -> Result<(), ProposalError> {
    match documents.find_by_id(id).await? {
        Some(_) => Ok(()),
        None => Err(ProposalError::not_found(format!("Document not found: {}", id))),
    }
}
