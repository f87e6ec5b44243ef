//! EditProposal aggregate entity.

use crate::domain::diff::{DiffEngine, DiffLine};
use crate::domain::foundation::{
    DocumentId, DomainError, ErrorCode, ProposalId, StateMachine, Timestamp, UserId,
};
use serde::{Deserialize, Serialize};

use super::ProposalStatus;

/// Outcome recorded when a proposal leaves `pending`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDecision {
    pub reviewer_id: UserId,
    pub reviewed_at: Timestamp,
    pub notes: Option<String>,
}

impl ReviewDecision {
    /// Blank notes are stored as `None`.
    pub fn new(reviewer_id: UserId, notes: Option<String>, reviewed_at: Timestamp) -> Self {
        Self {
            reviewer_id,
            reviewed_at,
            notes: notes.filter(|n| !n.trim().is_empty()),
        }
    }
}

/// Candidate replacement for a document's content.
///
/// # Invariants
///
/// - `baseline_content` never changes after creation
/// - `status` leaves `Pending` at most once
/// - `review` is `Some` exactly when `status` is terminal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditProposal {
    id: ProposalId,
    document_id: DocumentId,
    proposer_id: UserId,
    baseline_content: String,
    proposed_content: String,
    status: ProposalStatus,
    review: Option<ReviewDecision>,
    created_at: Timestamp,
}

impl EditProposal {
    /// Create a proposal awaiting review.
    pub fn pending(
        document_id: DocumentId,
        proposer_id: UserId,
        baseline_content: String,
        proposed_content: String,
    ) -> Self {
        Self {
            id: ProposalId::new(),
            document_id,
            proposer_id,
            baseline_content,
            proposed_content,
            status: ProposalStatus::Pending,
            review: None,
            created_at: Timestamp::now(),
        }
    }

    /// Create the audit record of a direct apply: approved, reviewed by the
    /// proposer at creation time.
    pub fn self_approved(
        document_id: DocumentId,
        proposer_id: UserId,
        baseline_content: String,
        proposed_content: String,
        at: Timestamp,
    ) -> Self {
        Self {
            id: ProposalId::new(),
            document_id,
            review: Some(ReviewDecision::new(proposer_id.clone(), None, at)),
            proposer_id,
            baseline_content,
            proposed_content,
            status: ProposalStatus::Approved,
            created_at: at,
        }
    }

    /// Reconstitute a proposal from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: ProposalId,
        document_id: DocumentId,
        proposer_id: UserId,
        baseline_content: String,
        proposed_content: String,
        status: ProposalStatus,
        review: Option<ReviewDecision>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            document_id,
            proposer_id,
            baseline_content,
            proposed_content,
            status,
            review,
            created_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &ProposalId {
        &self.id
    }

    pub fn document_id(&self) -> &DocumentId {
        &self.document_id
    }

    pub fn proposer_id(&self) -> &UserId {
        &self.proposer_id
    }

    pub fn baseline_content(&self) -> &str {
        &self.baseline_content
    }

    pub fn proposed_content(&self) -> &str {
        &self.proposed_content
    }

    pub fn status(&self) -> ProposalStatus {
        self.status
    }

    pub fn review(&self) -> Option<&ReviewDecision> {
        self.review.as_ref()
    }

    pub fn reviewer_id(&self) -> Option<&UserId> {
        self.review.as_ref().map(|r| &r.reviewer_id)
    }

    pub fn review_notes(&self) -> Option<&str> {
        self.review.as_ref().and_then(|r| r.notes.as_deref())
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn is_proposed_by(&self, user_id: &UserId) -> bool {
        &self.proposer_id == user_id
    }

    /// Line diff from baseline to proposed content.
    pub fn diff(&self, engine: &DiffEngine) -> Vec<DiffLine> {
        engine.compute(&self.baseline_content, &self.proposed_content)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Move out of `pending`, recording the decision.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the proposal is already terminal or the
    ///   target is `pending`
    pub fn review_as(
        &mut self,
        target: ProposalStatus,
        decision: ReviewDecision,
    ) -> Result<(), DomainError> {
        let next = self.status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!(
                    "Proposal {} is already {}, cannot move to {}",
                    self.id, self.status, target
                ),
            )
            .with_detail("proposal_id", self.id.to_string())
            .with_detail("status", self.status.as_str())
        })?;
        self.status = next;
        self.review = Some(decision);
        Ok(())
    }

    /// Roll a decision back to `pending` when its effect never landed.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the proposal is not currently in `from`
    ///   or `from` is not terminal
    pub fn reopen(&mut self, from: ProposalStatus) -> Result<(), DomainError> {
        if self.status != from || from.is_pending() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Proposal {} is {}, cannot reopen from {}", self.id, self.status, from),
            )
            .with_detail("proposal_id", self.id.to_string())
            .with_detail("status", self.status.as_str()));
        }
        self.status = ProposalStatus::Pending;
        self.review = None;
        Ok(())
    }
}
