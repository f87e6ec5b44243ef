//! Proposal module - edit proposals and their review lifecycle.
//!
//! A proposal moves exactly once from `pending` to `approved` or `rejected`.
//! Its baseline is a snapshot taken at submission and never changes.

mod aggregate;
mod errors;
mod status;

pub use aggregate::{EditProposal, ReviewDecision};
pub use errors::ProposalError;
pub use status::ProposalStatus;
