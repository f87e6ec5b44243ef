//! Authentication configuration
//!
//! Access tokens are HS256 JWTs signed with a shared secret and verified
//! locally on every request and live-channel connect.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Minimum signing key length accepted outside development.
pub const MIN_SECRET_BYTES: usize = 32;

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC signing key
    pub jwt_secret: SecretString,

    /// Expected `iss` claim
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Expected `aud` claim
    #[serde(default = "default_audience")]
    pub audience: String,

    /// Clock skew tolerated on `exp`
    #[serde(default = "default_leeway")]
    pub leeway_secs: u64,
}

impl AuthConfig {
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let secret = self.jwt_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if *environment != Environment::Development && secret.len() < MIN_SECRET_BYTES {
            return Err(ValidationError::JwtSecretTooShort(MIN_SECRET_BYTES));
        }
        if self.issuer.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__ISSUER"));
        }
        if self.audience.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__AUDIENCE"));
        }
        Ok(())
    }
}

fn default_issuer() -> String {
    "md-collab".to_string()
}

fn default_audience() -> String {
    "md-collab-api".to_string()
}

fn default_leeway() -> u64 {
    30
}
