//! In-memory proposal store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, ProposalId, UserId};
use crate::domain::proposal::{EditProposal, ProposalStatus, ReviewDecision};
use crate::ports::ProposalRepository;

#[derive(Clone, Default)]
pub struct InMemoryProposalRepository {
    proposals: Arc<RwLock<HashMap<ProposalId, EditProposal>>>,
}

impl InMemoryProposalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn collect<F>(&self, keep: F) -> Vec<EditProposal>
    where
        F: Fn(&EditProposal) -> bool,
    {
        let mut out: Vec<EditProposal> = self
            .proposals
            .read()
            .await
            .values()
            .filter(|p| keep(p))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at().cmp(a.created_at()));
        out
    }
}

#[async_trait]
impl ProposalRepository for InMemoryProposalRepository {
    async fn create(&self, proposal: &EditProposal) -> Result<(), DomainError> {
        self.proposals
            .write()
            .await
            .insert(*proposal.id(), proposal.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ProposalId) -> Result<Option<EditProposal>, DomainError> {
        Ok(self.proposals.read().await.get(id).cloned())
    }

    async fn list_by_status(
        &self,
        status: ProposalStatus,
    ) -> Result<Vec<EditProposal>, DomainError> {
        Ok(self.collect(|p| p.status() == status).await)
    }

    async fn list_by_proposer(&self, proposer: &UserId) -> Result<Vec<EditProposal>, DomainError> {
        Ok(self.collect(|p| p.is_proposed_by(proposer)).await)
    }

    async fn list_all(&self) -> Result<Vec<EditProposal>, DomainError> {
        Ok(self.collect(|_| true).await)
    }

    async fn transition(
        &self,
        id: &ProposalId,
        target: ProposalStatus,
        decision: ReviewDecision,
    ) -> Result<EditProposal, DomainError> {
        let mut proposals = self.proposals.write().await;
        let proposal = proposals
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(ErrorCode::ProposalNotFound, "proposal", id))?;
        proposal.review_as(target, decision)?;
        Ok(proposal.clone())
    }

    async fn reopen(
        &self,
        id: &ProposalId,
        from: ProposalStatus,
    ) -> Result<EditProposal, DomainError> {
        let mut proposals = self.proposals.write().await;
        let proposal = proposals
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(ErrorCode::ProposalNotFound, "proposal", id))?;
        proposal.reopen(from)?;
        Ok(proposal.clone())
    }

    async fn remove(&self, id: &ProposalId) -> Result<(), DomainError> {
        self.proposals.write().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DocumentId, Timestamp};

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn decision(by: &str) -> ReviewDecision {
        ReviewDecision::new(user(by), None, Timestamp::now())
    }

    #[tokio::test]
    async fn transition_is_compare_and_set() {
        let repo = InMemoryProposalRepository::new();
        let p = EditProposal::pending(DocumentId::new(), user("ed"), "a".into(), "b".into());
        repo.create(&p).await.unwrap();

        let approved = repo
            .transition(p.id(), ProposalStatus::Approved, decision("admin"))
            .await
            .unwrap();
        assert_eq!(approved.status(), ProposalStatus::Approved);

        let err = repo
            .transition(p.id(), ProposalStatus::Rejected, decision("admin2"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);

        let stored = repo.find_by_id(p.id()).await.unwrap().unwrap();
        assert_eq!(stored.reviewer_id(), Some(&user("admin")));
    }

    #[tokio::test]
    async fn racing_transitions_have_exactly_one_winner() {
        let repo = InMemoryProposalRepository::new();
        let p = EditProposal::pending(DocumentId::new(), user("ed"), "a".into(), "b".into());
        repo.create(&p).await.unwrap();

        let mut handles = Vec::new();
        for n in 0..10 {
            let repo = repo.clone();
            let id = *p.id();
            handles.push(tokio::spawn(async move {
                repo.transition(&id, ProposalStatus::Approved, decision(&format!("r{}", n)))
                    .await
            }));
        }
        let mut wins = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(_) => wins += 1,
                Err(e) => assert_eq!(e.code, ErrorCode::InvalidStateTransition),
            }
        }
        assert_eq!(wins, 1);
    }

    #[tokio::test]
    async fn reopen_returns_proposal_to_pending() {
        let repo = InMemoryProposalRepository::new();
        let p = EditProposal::pending(DocumentId::new(), user("ed"), "a".into(), "b".into());
        repo.create(&p).await.unwrap();
        repo.transition(p.id(), ProposalStatus::Approved, decision("admin"))
            .await
            .unwrap();

        let reopened = repo.reopen(p.id(), ProposalStatus::Approved).await.unwrap();
        assert!(reopened.status().is_pending());
        assert!(reopened.reviewer_id().is_none());

        let err = repo
            .reopen(p.id(), ProposalStatus::Approved)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);

        repo.remove(p.id()).await.unwrap();
        assert!(repo.find_by_id(p.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn transition_missing_is_not_found() {
        let repo = InMemoryProposalRepository::new();
        let err = repo
            .transition(&ProposalId::new(), ProposalStatus::Approved, decision("a"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProposalNotFound);
    }

    #[tokio::test]
    async fn listings_filter_by_status_and_proposer() {
        let repo = InMemoryProposalRepository::new();
        let doc = DocumentId::new();
        let a = EditProposal::pending(doc, user("ann"), "".into(), "1".into());
        let b = EditProposal::pending(doc, user("ben"), "".into(), "2".into());
        repo.create(&a).await.unwrap();
        repo.create(&b).await.unwrap();
        repo.transition(b.id(), ProposalStatus::Rejected, decision("admin"))
            .await
            .unwrap();

        assert_eq!(repo.list_by_status(ProposalStatus::Pending).await.unwrap().len(), 1);
        assert_eq!(repo.list_by_proposer(&user("ben")).await.unwrap()[0].id(), b.id());
        assert_eq!(repo.list_all().await.unwrap().len(), 2);
    }
}
