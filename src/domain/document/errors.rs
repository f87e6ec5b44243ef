//! Document-specific error types.

use crate::domain::foundation::{DocumentId, DomainError, ErrorCode};

/// Document-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// Document was not found.
    NotFound(DocumentId),
    /// Actor lacks the capability for this action.
    Forbidden(String),
    /// Validation failed.
    ValidationFailed { field: String, message: String },
    /// Infrastructure error.
    Infrastructure(String),
}

impl DocumentError {
    pub fn not_found(id: DocumentId) -> Self {
        DocumentError::NotFound(id)
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DocumentError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            DocumentError::NotFound(_) => ErrorCode::DocumentNotFound,
            DocumentError::Forbidden(_) => ErrorCode::Forbidden,
            DocumentError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            DocumentError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            DocumentError::NotFound(id) => format!("Document not found: {}", id),
            DocumentError::Forbidden(msg) => format!("Permission denied: {}", msg),
            DocumentError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            DocumentError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for DocumentError {}

impl From<DomainError> for DocumentError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::DocumentNotFound => match err.details.get("document_id").map(|s| s.parse()) {
                Some(Ok(id)) => DocumentError::NotFound(id),
                _ => DocumentError::Infrastructure(err.to_string()),
            },
            ErrorCode::Forbidden => DocumentError::Forbidden(err.message),
            code if code.is_validation() => DocumentError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => DocumentError::Infrastructure(err.to_string()),
        }
    }
}
