//! HTTP handlers for proposal endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{invalid_id, ErrorResponse};
use crate::adapters::http::middleware::Caller;
use crate::application::handlers::proposal::{
    ApproveProposalCommand, ApproveProposalHandler, GetProposalHandler, GetProposalQuery,
    ListProposalsHandler, ListProposalsQuery, ProposalScope, RejectProposalCommand,
    RejectProposalHandler, SubmitProposalCommand, SubmitProposalHandler,
};
use crate::domain::foundation::{CommandMetadata, DocumentId, ProposalId};
use crate::domain::proposal::ProposalError;

use super::dto::{
    ListProposalsParams, ProposalDetailResponse, ProposalResponse, ReviewRequest,
    SubmitProposalRequest, SubmitProposalResponse,
};

#[derive(Clone)]
pub struct ProposalHandlers {
    submit_handler: Arc<SubmitProposalHandler>,
    approve_handler: Arc<ApproveProposalHandler>,
    reject_handler: Arc<RejectProposalHandler>,
    get_handler: Arc<GetProposalHandler>,
    list_handler: Arc<ListProposalsHandler>,
}

impl ProposalHandlers {
    pub fn new(
        submit_handler: Arc<SubmitProposalHandler>,
        approve_handler: Arc<ApproveProposalHandler>,
        reject_handler: Arc<RejectProposalHandler>,
        get_handler: Arc<GetProposalHandler>,
        list_handler: Arc<ListProposalsHandler>,
    ) -> Self {
        Self {
            submit_handler,
            approve_handler,
            reject_handler,
            get_handler,
            list_handler,
        }
    }
}

/// POST /api/proposals
pub async fn submit_proposal(
    State(handlers): State<ProposalHandlers>,
    Caller(metadata): Caller,
    Json(req): Json<SubmitProposalRequest>,
) -> Response {
    let Ok(document_id) = req.document_id.parse::<DocumentId>() else {
        return handle_proposal_error(ProposalError::validation(
            "document_id",
            "Invalid document ID",
        ));
    };
    let cmd = SubmitProposalCommand {
        document_id,
        proposed_content: req.content,
    };

    match handlers.submit_handler.handle(cmd, metadata).await {
        Ok(result) => {
            let applied = result.applied();
            let message = if applied {
                "Changes applied directly"
            } else {
                "Proposal submitted for review"
            };
            let response = SubmitProposalResponse {
                message: message.to_string(),
                applied,
                proposal: ProposalResponse::from(&result.proposal),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => handle_proposal_error(e),
    }
}

/// GET /api/proposals?status=
pub async fn list_proposals(
    State(handlers): State<ProposalHandlers>,
    Caller(metadata): Caller,
    Query(params): Query<ListProposalsParams>,
) -> Response {
    let scope = match params.scope() {
        Ok(scope) => scope,
        Err(message) => return handle_proposal_error(ProposalError::validation("status", message)),
    };
    list(handlers, metadata, scope).await
}

/// GET /api/proposals/mine
pub async fn list_my_proposals(
    State(handlers): State<ProposalHandlers>,
    Caller(metadata): Caller,
) -> Response {
    list(handlers, metadata, ProposalScope::Mine).await
}

async fn list(
    handlers: ProposalHandlers,
    metadata: CommandMetadata,
    scope: ProposalScope,
) -> Response {
    match handlers
        .list_handler
        .handle(ListProposalsQuery { scope }, metadata)
        .await
    {
        Ok(proposals) => {
            let items: Vec<ProposalResponse> = proposals.iter().map(ProposalResponse::from).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => handle_proposal_error(e),
    }
}

/// GET /api/proposals/:id
pub async fn get_proposal(
    State(handlers): State<ProposalHandlers>,
    Caller(metadata): Caller,
    Path(proposal_id): Path<String>,
) -> Response {
    let Ok(proposal_id) = proposal_id.parse::<ProposalId>() else {
        return invalid_id("proposal");
    };
    match handlers
        .get_handler
        .handle(GetProposalQuery { proposal_id }, metadata)
        .await
    {
        Ok(view) => (StatusCode::OK, Json(ProposalDetailResponse::from(view))).into_response(),
        Err(e) => handle_proposal_error(e),
    }
}

/// POST /api/proposals/:id/approve
pub async fn approve_proposal(
    State(handlers): State<ProposalHandlers>,
    Caller(metadata): Caller,
    Path(proposal_id): Path<String>,
    body: Option<Json<ReviewRequest>>,
) -> Response {
    let Ok(proposal_id) = proposal_id.parse::<ProposalId>() else {
        return invalid_id("proposal");
    };
    let Json(review) = body.unwrap_or_default();
    let cmd = ApproveProposalCommand {
        proposal_id,
        notes: review.notes,
    };
    match handlers.approve_handler.handle(cmd, metadata).await {
        Ok(result) => (StatusCode::OK, Json(ProposalResponse::from(&result.proposal))).into_response(),
        Err(e) => handle_proposal_error(e),
    }
}

/// POST /api/proposals/:id/reject
pub async fn reject_proposal(
    State(handlers): State<ProposalHandlers>,
    Caller(metadata): Caller,
    Path(proposal_id): Path<String>,
    body: Option<Json<ReviewRequest>>,
) -> Response {
    let Ok(proposal_id) = proposal_id.parse::<ProposalId>() else {
        return invalid_id("proposal");
    };
    let Json(review) = body.unwrap_or_default();
    let cmd = RejectProposalCommand {
        proposal_id,
        notes: review.notes,
    };
    match handlers.reject_handler.handle(cmd, metadata).await {
        Ok(result) => (StatusCode::OK, Json(ProposalResponse::from(&result.proposal))).into_response(),
        Err(e) => handle_proposal_error(e),
    }
}

fn handle_proposal_error(error: ProposalError) -> Response {
    let code = error.code();
    let body = match &error {
        ProposalError::ValidationFailed { field, .. } => ErrorResponse::new(code, error.message())
            .with_details(serde_json::json!({ "field": field })),
        ProposalError::Infrastructure(msg) => {
            tracing::error!(error = %msg, "proposal request failed");
            ErrorResponse::new(code, "Internal error")
        }
        _ => ErrorResponse::new(code, error.message()),
    };
    body.into_response_for(code)
}
