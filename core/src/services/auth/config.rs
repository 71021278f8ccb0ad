//! Configuration for the authentication service

use acct_shared::{AuthConfig, UnknownEmailPolicy};

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Error reported when the email matches no account
    pub unknown_email: UnknownEmailPolicy,
    /// Whether inactive (unverified) accounts may log in
    pub require_active: bool,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            unknown_email: UnknownEmailPolicy::Unauthorized,
            require_active: true,
        }
    }
}

impl From<&AuthConfig> for AuthServiceConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            unknown_email: config.unknown_email,
            require_active: config.require_active,
        }
    }
}
