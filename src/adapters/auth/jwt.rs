//! HS256 JWT session validator.
//!
//! Tokens are verified locally against a shared secret:
//! - **Signature**: HS256 with the configured key
//! - **Issuer (iss)** and **Audience (aud)**: must match configuration
//! - **Expiry (exp)**: must be in the future, within `leeway`
//!
//! `issue` mints tokens with the same key; the binary uses it for the
//! demo users and tests use it to drive the HTTP surface.

use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, AuthenticatedUser, Timestamp, UserId};
use crate::ports::SessionValidator;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iss: String,
    aud: String,
    exp: i64,
    iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

pub struct JwtSessionValidator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
}

impl JwtSessionValidator {
    pub fn new(secret: &SecretString, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        let issuer = issuer.into();
        let audience = audience.into();
        let key = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&issuer]);
        validation.set_audience(&[&audience]);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(key),
            decoding_key: DecodingKey::from_secret(key),
            validation,
            issuer,
            audience,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        let mut validator = Self::new(&config.jwt_secret, &config.issuer, &config.audience);
        validator.validation.leeway = config.leeway_secs;
        validator
    }

    /// Sign a token for `user_id` valid for `ttl_secs` seconds.
    pub fn issue(
        &self,
        user_id: &UserId,
        display_name: Option<&str>,
        ttl_secs: i64,
    ) -> Result<String, AuthError> {
        let now = Timestamp::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            exp: now.plus_secs(ttl_secs).as_unix_secs(),
            iat: now.as_unix_secs(),
            name: display_name.map(str::to_string),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::service_unavailable(format!("token signing failed: {}", e)))
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => {
                    tracing::warn!(error = %e, "Token issued for another service");
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::debug!(error = %e, "Token validation failed");
                    AuthError::InvalidToken
                }
            }
        })?;

        let id = UserId::new(data.claims.sub).map_err(|_| AuthError::InvalidToken)?;
        Ok(AuthenticatedUser::new(id, data.claims.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> JwtSessionValidator {
        JwtSessionValidator::new(
            &SecretString::new("test-signing-key".to_string()),
            "md-collab",
            "md-collab-api",
        )
    }

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[tokio::test]
    async fn issued_token_round_trips_to_user() {
        let v = validator();
        let token = v.issue(&user("ed"), Some("Editor"), 300).unwrap();

        let authed = v.validate(&token).await.unwrap();
        assert_eq!(authed.id, user("ed"));
        assert_eq!(authed.display_name.as_deref(), Some("Editor"));
    }

    #[tokio::test]
    async fn expired_token_is_reported_as_expired() {
        let v = validator();
        let token = v.issue(&user("ed"), None, -600).unwrap();
        assert_eq!(v.validate(&token).await, Err(AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn foreign_key_or_audience_is_invalid() {
        let other_key = JwtSessionValidator::new(
            &SecretString::new("another-key".to_string()),
            "md-collab",
            "md-collab-api",
        );
        let token = other_key.issue(&user("ed"), None, 300).unwrap();
        assert_eq!(validator().validate(&token).await, Err(AuthError::InvalidToken));

        let other_audience = JwtSessionValidator::new(
            &SecretString::new("test-signing-key".to_string()),
            "md-collab",
            "someone-else",
        );
        let token = other_audience.issue(&user("ed"), None, 300).unwrap();
        assert_eq!(validator().validate(&token).await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn garbage_is_invalid() {
        assert_eq!(
            validator().validate("not-a-jwt").await,
            Err(AuthError::InvalidToken)
        );
    }
}
