//! Proposal repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ProposalId, UserId};
use crate::domain::proposal::{EditProposal, ProposalStatus, ReviewDecision};

#[async_trait]
pub trait ProposalRepository: Send + Sync {
    /// Persist a new proposal (pending or self-approved).
    async fn create(&self, proposal: &EditProposal) -> Result<(), DomainError>;

    /// Find a proposal by id. Returns `None` if not found.
    async fn find_by_id(&self, id: &ProposalId) -> Result<Option<EditProposal>, DomainError>;

    /// Proposals in the given status, newest first.
    async fn list_by_status(&self, status: ProposalStatus)
        -> Result<Vec<EditProposal>, DomainError>;

    /// Proposals submitted by one user, newest first.
    async fn list_by_proposer(&self, proposer: &UserId) -> Result<Vec<EditProposal>, DomainError>;

    /// Every proposal, newest first.
    async fn list_all(&self) -> Result<Vec<EditProposal>, DomainError>;

    /// Compare-and-set out of `pending`.
    ///
    /// # Errors
    ///
    /// - `ProposalNotFound` if the proposal doesn't exist
    /// - `InvalidStateTransition` if it is no longer pending, including when
    ///   another caller won the race
    async fn transition(
        &self,
        id: &ProposalId,
        target: ProposalStatus,
        decision: ReviewDecision,
    ) -> Result<EditProposal, DomainError>;

    /// Compare-and-set from `from` back to `pending`, clearing the decision.
    ///
    /// Undoes a transition whose document write failed.
    async fn reopen(&self, id: &ProposalId, from: ProposalStatus)
        -> Result<EditProposal, DomainError>;

    /// Delete a proposal whose document write never happened.
    async fn remove(&self, id: &ProposalId) -> Result<(), DomainError>;
}
