//! JWT token generation and validation
//!
//! Tokens are signed with HS256. The signing secret is an explicit
//! configuration value handed to [`JwtService::new`] — never process-wide
//! state — so tests and multi-tenant deployments can run several isolated
//! instances side by side.

use chrono::Duration;

use crate::claims::AccessClaims;
use crate::error::{AuthError, AuthResult};

#[cfg(feature = "jwt")]
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// JWT configuration for token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HMAC signing
    pub secret: String,

    /// Token issuer
    pub issuer: String,

    /// Access token duration
    pub token_duration: Duration,
}

impl JwtConfig {
    /// Create a configuration with the default issuer and a one-hour token
    /// lifetime.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: "taskdeck".to_string(),
            token_duration: Duration::hours(1),
        }
    }
}

/// JWT service for token operations.
pub struct JwtService {
    config: JwtConfig,
    #[cfg(feature = "jwt")]
    encoding_key: EncodingKey,
    #[cfg(feature = "jwt")]
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl JwtService {
    /// Create a new JWT service with the given configuration.
    #[cfg(feature = "jwt")]
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Create with a secret and default configuration.
    #[cfg(feature = "jwt")]
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self::new(JwtConfig::new(secret))
    }

    /// Get the configuration.
    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    /// Encode claims into a signed token string.
    #[cfg(feature = "jwt")]
    pub fn encode_claims(&self, claims: &AccessClaims) -> AuthResult<String> {
        let header = Header::new(Algorithm::HS256);
        encode(&header, claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(format!("Token encoding failed: {e}")))
    }

    /// Validate and decode a token.
    ///
    /// # Returns
    ///
    /// Decoded claims if the signature, expiry, and issuer check out
    #[cfg(feature = "jwt")]
    pub fn validate_token(&self, token: &str) -> AuthResult<AccessClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    AuthError::InvalidToken("Malformed token".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AuthError::InvalidToken("Invalid signature".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                    AuthError::InvalidToken("Invalid issuer".to_string())
                }
                _ => AuthError::InvalidToken(e.to_string()),
            },
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(all(test, feature = "jwt"))]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn test_secret() -> String {
        "test-secret-key-for-jwt-signing-minimum-32-chars".to_string()
    }

    #[test]
    fn test_token_round_trip() {
        let service = JwtService::with_secret(test_secret());
        let user_id = Uuid::now_v7();
        let org_id = Uuid::now_v7();

        let claims = AccessClaims::new(user_id, Duration::hours(1)).with_org(org_id);
        let token = service.encode_claims(&claims).unwrap();
        let decoded = service.validate_token(&token).unwrap();

        assert_eq!(decoded.user_id(), Some(user_id));
        assert_eq!(decoded.org_id, Some(org_id));
    }

    #[test]
    fn test_invalid_token() {
        let service = JwtService::with_secret(test_secret());
        let result = service.validate_token("not-a-token");

        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = JwtService::with_secret(test_secret());
        let other = JwtService::with_secret("another-secret-key-of-sufficient-length");

        let claims = AccessClaims::new(Uuid::now_v7(), Duration::hours(1));
        let token = issuer.encode_claims(&claims).unwrap();

        assert!(matches!(
            other.validate_token(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_expired_token() {
        let service = JwtService::with_secret(test_secret());
        let mut claims = AccessClaims::new(Uuid::now_v7(), Duration::hours(1));
        claims.exp = chrono::Utc::now().timestamp() - 3600;

        let token = service.encode_claims(&claims).unwrap();
        assert!(matches!(
            service.validate_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let service = JwtService::with_secret(test_secret());
        let mut claims = AccessClaims::new(Uuid::now_v7(), Duration::hours(1));
        claims.iss = "someone-else".to_string();

        let token = service.encode_claims(&claims).unwrap();
        assert!(matches!(
            service.validate_token(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }
}
