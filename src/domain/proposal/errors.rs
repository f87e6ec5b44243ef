//! Proposal-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode};

/// Proposal workflow errors.
///
/// `NotFound` covers missing proposals and, on read paths, missing
/// documents. Submitting against a missing document is `ValidationFailed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProposalError {
    /// Proposal (or referenced entity) was not found.
    NotFound(String),
    /// Actor lacks the capability or ownership for this action.
    Forbidden(String),
    /// Transition attempted on a non-pending proposal.
    InvalidState(String),
    /// Validation failed.
    ValidationFailed { field: String, message: String },
    /// Infrastructure error.
    Infrastructure(String),
}

impl ProposalError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ProposalError::NotFound(message.into())
    }
    pub fn forbidden(message: impl Into<String>) -> Self {
        ProposalError::Forbidden(message.into())
    }
    pub fn invalid_state(message: impl Into<String>) -> Self {
        ProposalError::InvalidState(message.into())
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ProposalError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            ProposalError::NotFound(_) => ErrorCode::ProposalNotFound,
            ProposalError::Forbidden(_) => ErrorCode::Forbidden,
            ProposalError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            ProposalError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            ProposalError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            ProposalError::NotFound(msg) => msg.clone(),
            ProposalError::Forbidden(msg) => format!("Permission denied: {}", msg),
            ProposalError::InvalidState(msg) => format!("Invalid state: {}", msg),
            ProposalError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            ProposalError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for ProposalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ProposalError {}

impl From<DomainError> for ProposalError {
    fn from(err: DomainError) -> Self {
        match err.code {
            code if code.is_not_found() => ProposalError::NotFound(err.message),
            ErrorCode::Forbidden => ProposalError::Forbidden(err.message),
            ErrorCode::InvalidStateTransition => ProposalError::InvalidState(err.message),
            code if code.is_validation() => ProposalError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => ProposalError::Infrastructure(err.to_string()),
        }
    }
}
