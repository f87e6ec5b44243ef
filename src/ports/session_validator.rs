//! Session validation port for bearer token validation.
//!
//! The live channel and the HTTP API both gate access on a signed,
//! expiring credential that can be verified locally, without a store
//! round-trip.
//!
//! All implementations MUST validate:
//! - **Issuer (iss)**: Token must come from the expected issuer
//! - **Audience (aud)**: Token must be intended for this service
//! - **Expiry (exp)**: Token must not be expired

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates access tokens and extracts user identity.
///
/// # Contract
///
/// - `AuthError::InvalidToken` for malformed or badly signed tokens
/// - `AuthError::TokenExpired` for expired tokens
/// - `AuthError::ServiceUnavailable` when validation cannot run
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a raw token (without "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_validator_trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn SessionValidator>();
    }
}
