//! HTTP routes for proposal endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    approve_proposal, get_proposal, list_my_proposals, list_proposals, reject_proposal,
    submit_proposal, ProposalHandlers,
};

pub fn proposal_routes(handlers: ProposalHandlers) -> Router {
    Router::new()
        .route("/", get(list_proposals).post(submit_proposal))
        .route("/mine", get(list_my_proposals))
        .route("/:id", get(get_proposal))
        .route("/:id/approve", post(approve_proposal))
        .route("/:id/reject", post(reject_proposal))
        .with_state(handlers)
}
