//! Notification-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// Notification missing or not owned by the caller.
    NotFound(String),
    /// Validation failed.
    ValidationFailed { field: String, message: String },
    /// Infrastructure error.
    Infrastructure(String),
}

impl NotificationError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        NotificationError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            NotificationError::NotFound(_) => ErrorCode::NotificationNotFound,
            NotificationError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            NotificationError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            NotificationError::NotFound(msg) => msg.clone(),
            NotificationError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            NotificationError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for NotificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for NotificationError {}

impl From<DomainError> for NotificationError {
    fn from(err: DomainError) -> Self {
        match err.code {
            code if code.is_not_found() => NotificationError::NotFound(err.message),
            code if code.is_validation() => NotificationError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => NotificationError::Infrastructure(err.to_string()),
        }
    }
}

impl From<crate::domain::foundation::ValidationError> for NotificationError {
    fn from(err: crate::domain::foundation::ValidationError) -> Self {
        NotificationError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}
