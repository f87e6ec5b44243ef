//! HTTP adapter for edit proposal endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ListProposalsParams, ProposalDetailResponse, ProposalResponse, ReviewRequest,
    SubmitProposalRequest, SubmitProposalResponse,
};
pub use handlers::ProposalHandlers;
pub use routes::proposal_routes;
