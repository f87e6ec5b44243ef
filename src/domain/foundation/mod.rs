//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, capabilities and error types
//! that form the vocabulary of the review workflow.

mod auth;
mod capability;
mod command;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use capability::{Actor, Capability, CapabilitySet, Role, RoleGroup};
pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{DocumentId, NotificationId, ProposalId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
