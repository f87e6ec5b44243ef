//! PostgreSQL implementation of ProposalRepository.
//!
//! `transition` is a single `UPDATE ... WHERE status = 'pending'`: of any
//! number of racing reviewers, across processes, exactly one row update
//! succeeds.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool};
use uuid::Uuid;

use crate::domain::foundation::{
    DocumentId, DomainError, ErrorCode, ProposalId, StateMachine, Timestamp, UserId,
};
use crate::domain::proposal::{EditProposal, ProposalStatus, ReviewDecision};
use crate::ports::ProposalRepository;

use super::{column, db_error, parse_column};

const PROPOSAL_COLUMNS: &str = "id, document_id, proposer_id, baseline_content, proposed_content, \
     status, reviewer_id, review_notes, reviewed_at, created_at";

#[derive(Clone)]
pub struct PostgresProposalRepository {
    pool: PgPool,
}

impl PostgresProposalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_where(
        &self,
        clause: &str,
        bind: Option<&str>,
    ) -> Result<Vec<EditProposal>, DomainError> {
        let sql = format!(
            "SELECT {} FROM edit_proposals {} ORDER BY created_at DESC",
            PROPOSAL_COLUMNS, clause
        );
        let mut query = sqlx::query(&sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list proposals"))?;
        rows.into_iter().map(row_to_proposal).collect()
    }
}

#[async_trait]
impl ProposalRepository for PostgresProposalRepository {
    async fn create(&self, proposal: &EditProposal) -> Result<(), DomainError> {
        let review = proposal.review();
        sqlx::query(
            r#"
            INSERT INTO edit_proposals (
                id, document_id, proposer_id, baseline_content, proposed_content,
                status, reviewer_id, review_notes, reviewed_at, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(proposal.id().as_uuid())
        .bind(proposal.document_id().as_uuid())
        .bind(proposal.proposer_id().as_str())
        .bind(proposal.baseline_content())
        .bind(proposal.proposed_content())
        .bind(proposal.status().as_str())
        .bind(review.map(|r| r.reviewer_id.as_str()))
        .bind(review.and_then(|r| r.notes.as_deref()))
        .bind(review.map(|r| *r.reviewed_at.as_datetime()))
        .bind(proposal.created_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert proposal"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ProposalId) -> Result<Option<EditProposal>, DomainError> {
        let sql = format!("SELECT {} FROM edit_proposals WHERE id = $1", PROPOSAL_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch proposal"))?;

        row.map(row_to_proposal).transpose()
    }

    async fn list_by_status(
        &self,
        status: ProposalStatus,
    ) -> Result<Vec<EditProposal>, DomainError> {
        self.fetch_where("WHERE status = $1", Some(status.as_str()))
            .await
    }

    async fn list_by_proposer(&self, proposer: &UserId) -> Result<Vec<EditProposal>, DomainError> {
        self.fetch_where("WHERE proposer_id = $1", Some(proposer.as_str()))
            .await
    }

    async fn list_all(&self) -> Result<Vec<EditProposal>, DomainError> {
        self.fetch_where("", None).await
    }

    async fn transition(
        &self,
        id: &ProposalId,
        target: ProposalStatus,
        decision: ReviewDecision,
    ) -> Result<EditProposal, DomainError> {
        if ProposalStatus::Pending.can_transition_to(&target) {
            let sql = format!(
                r#"
                UPDATE edit_proposals
                SET status = $2, reviewer_id = $3, review_notes = $4, reviewed_at = $5
                WHERE id = $1 AND status = 'pending'
                RETURNING {}
                "#,
                PROPOSAL_COLUMNS
            );
            let row = sqlx::query(&sql)
                .bind(id.as_uuid())
                .bind(target.as_str())
                .bind(decision.reviewer_id.as_str())
                .bind(decision.notes.as_deref())
                .bind(decision.reviewed_at.as_datetime())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to transition proposal"))?;

            if let Some(row) = row {
                return row_to_proposal(row);
            }
        }

        // Lost the race, already terminal, or missing.
        let mut current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::ProposalNotFound, "proposal", id))?;
        current.review_as(target, decision)?;
        Err(DomainError::new(
            ErrorCode::InvalidStateTransition,
            format!("Proposal {} changed concurrently", id),
        ))
    }

    async fn reopen(
        &self,
        id: &ProposalId,
        from: ProposalStatus,
    ) -> Result<EditProposal, DomainError> {
        if !from.is_pending() {
            let sql = format!(
                r#"
                UPDATE edit_proposals
                SET status = 'pending', reviewer_id = NULL, review_notes = NULL, reviewed_at = NULL
                WHERE id = $1 AND status = $2
                RETURNING {}
                "#,
                PROPOSAL_COLUMNS
            );
            let row = sqlx::query(&sql)
                .bind(id.as_uuid())
                .bind(from.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to reopen proposal"))?;

            if let Some(row) = row {
                return row_to_proposal(row);
            }
        }

        let mut current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::ProposalNotFound, "proposal", id))?;
        current.reopen(from)?;
        Err(DomainError::new(
            ErrorCode::InvalidStateTransition,
            format!("Proposal {} changed concurrently", id),
        ))
    }

    async fn remove(&self, id: &ProposalId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM edit_proposals WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete proposal"))?;
        Ok(())
    }
}

fn row_to_proposal(row: PgRow) -> Result<EditProposal, DomainError> {
    let id: Uuid = column(&row, "id")?;
    let document_id: Uuid = column(&row, "document_id")?;
    let proposer: String = column(&row, "proposer_id")?;
    let status: String = column(&row, "status")?;
    let reviewer: Option<String> = column(&row, "reviewer_id")?;
    let notes: Option<String> = column(&row, "review_notes")?;
    let reviewed_at: Option<DateTime<Utc>> = column(&row, "reviewed_at")?;
    let created_at: DateTime<Utc> = column(&row, "created_at")?;

    let review = match (reviewer, reviewed_at) {
        (Some(reviewer), Some(at)) => Some(ReviewDecision::new(
            UserId::new(reviewer)?,
            notes,
            Timestamp::from_datetime(at),
        )),
        _ => None,
    };

    Ok(EditProposal::reconstitute(
        ProposalId::from_uuid(id),
        DocumentId::from_uuid(document_id),
        UserId::new(proposer)?,
        column(&row, "baseline_content")?,
        column(&row, "proposed_content")?,
        parse_column("status", &status)?,
        review,
        Timestamp::from_datetime(created_at),
    ))
}
