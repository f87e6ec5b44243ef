//! Authentication types for the domain layer.
//!
//! `AuthenticatedUser` is what a verified credential proves: who the caller
//! is. What the caller may do is resolved separately into a
//! [`CapabilitySet`](super::CapabilitySet) by the user directory.

use super::UserId;
use thiserror::Error;

/// Authenticated user extracted from a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The unique user identifier (token subject).
    pub id: UserId,

    /// Display name if the token carried one.
    pub display_name: Option<String>,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, display_name: Option<String>) -> Self {
        Self { id, display_name }
    }

    /// Returns the display name, or the user id as fallback.
    pub fn display_name_or_id(&self) -> &str {
        self.display_name.as_deref().unwrap_or(self.id.as_str())
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The validator could not run (misconfiguration, key material).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the user should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_id() {
        let anon = AuthenticatedUser::new(UserId::new("u-1").unwrap(), None);
        assert_eq!(anon.display_name_or_id(), "u-1");

        let named = AuthenticatedUser::new(UserId::new("u-1").unwrap(), Some("Ada".into()));
        assert_eq!(named.display_name_or_id(), "Ada");
    }

    #[test]
    fn expired_and_invalid_tokens_require_reauthentication() {
        assert!(AuthError::TokenExpired.requires_reauthentication());
        assert!(AuthError::InvalidToken.requires_reauthentication());
        assert!(!AuthError::service_unavailable("no key").requires_reauthentication());
    }
}
