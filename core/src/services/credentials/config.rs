//! Configuration for the credential services

use acct_shared::AuthConfig;
use chrono::Duration;

use crate::domain::entities::TOKEN_LIFETIME_HOURS;

/// Configuration for token signing and password hashing
#[derive(Debug, Clone)]
pub struct CredentialsConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Lifetime of issued tokens
    pub token_lifetime: Duration,
    /// bcrypt cost factor
    pub bcrypt_cost: u32,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-please-change-in-production".to_string(),
            token_lifetime: Duration::hours(TOKEN_LIFETIME_HOURS),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl From<&AuthConfig> for CredentialsConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            jwt_secret: config.jwt.secret.clone(),
            token_lifetime: Duration::hours(config.jwt.token_lifetime_hours),
            bcrypt_cost: config.bcrypt_cost,
        }
    }
}
