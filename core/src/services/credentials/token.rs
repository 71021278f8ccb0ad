//! Bearer token issuance and parsing

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{Claims, Role};
use crate::errors::{AppError, AppResult};

use super::config::CredentialsConfig;

/// Why a token was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("token signature verification failed")]
    InvalidSignature,

    #[error("malformed token")]
    Malformed,
}

/// Signs and verifies HS256 tokens with a fixed lifetime
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(config: &CredentialsConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit clock in `parse_token_at`.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            lifetime: config.token_lifetime,
        }
    }

    /// Issue a token for `user_id` valid from now
    pub fn issue_token(&self, user_id: Uuid, role: Role) -> AppResult<String> {
        self.issue_token_at(user_id, role, Utc::now())
    }

    /// Issue a token as if it were `issued_at`
    pub fn issue_token_at(
        &self,
        user_id: Uuid,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> AppResult<String> {
        let claims = Claims::new(user_id, role, issued_at, self.lifetime);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal("Failed to generate token").with_source(e))
    }

    /// Verify signature, structure and expiry against the current time
    pub fn parse_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.parse_token_at(token, Utc::now())
    }

    /// Verify signature and structure, and that `now` is before expiry
    pub fn parse_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                JwtErrorKind::InvalidSignature => TokenError::InvalidSignature,
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;

        if !data.claims.is_valid_at(now) {
            return Err(TokenError::Expired);
        }
        Ok(data.claims)
    }
}
