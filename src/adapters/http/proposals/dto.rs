//! HTTP DTOs for proposal endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::proposal::{ProposalScope, ProposalView};
use crate::domain::diff::{DiffLine, DiffStats};
use crate::domain::proposal::{EditProposal, ProposalStatus};

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitProposalRequest {
    pub document_id: String,
    pub content: String,
}

/// Body of approve/reject. May be omitted entirely.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

/// `?status=pending|approved|rejected|all`; absent means `all`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListProposalsParams {
    #[serde(default)]
    pub status: Option<String>,
}

impl ListProposalsParams {
    pub fn scope(&self) -> Result<ProposalScope, String> {
        match self.status.as_deref() {
            None | Some("") | Some("all") => Ok(ProposalScope::All),
            Some(raw) => raw
                .parse::<ProposalStatus>()
                .map(ProposalScope::Status)
                .map_err(|e| e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProposalResponse {
    pub id: String,
    pub document_id: String,
    pub proposer_id: String,
    pub status: ProposalStatus,
    pub baseline_content: String,
    pub proposed_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<String>,
    pub created_at: String,
}

impl From<&EditProposal> for ProposalResponse {
    fn from(p: &EditProposal) -> Self {
        Self {
            id: p.id().to_string(),
            document_id: p.document_id().to_string(),
            proposer_id: p.proposer_id().to_string(),
            status: p.status(),
            baseline_content: p.baseline_content().to_string(),
            proposed_content: p.proposed_content().to_string(),
            reviewer_id: p.reviewer_id().map(ToString::to_string),
            review_notes: p.review_notes().map(str::to_string),
            reviewed_at: p
                .review()
                .map(|r| r.reviewed_at.as_datetime().to_rfc3339()),
            created_at: p.created_at().as_datetime().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitProposalResponse {
    pub message: String,
    /// True when the content was published without review.
    pub applied: bool,
    pub proposal: ProposalResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProposalDetailResponse {
    #[serde(flatten)]
    pub proposal: ProposalResponse,
    pub diff: Vec<DiffLine>,
    pub stats: DiffStats,
}

impl From<ProposalView> for ProposalDetailResponse {
    fn from(view: ProposalView) -> Self {
        Self {
            proposal: ProposalResponse::from(&view.proposal),
            diff: view.diff,
            stats: view.stats,
        }
    }
}
