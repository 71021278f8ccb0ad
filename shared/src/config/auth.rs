//! Authentication configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// Placeholder secret used outside production when `JWT_SECRET` is unset
pub const DEFAULT_JWT_SECRET: &str = "your-secret-key-change-in-production";

/// Cost factor matching `bcrypt::DEFAULT_COST`
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// HMAC secret used to sign and verify tokens
    pub secret: String,

    /// Token lifetime in hours
    #[serde(default = "default_token_lifetime_hours")]
    pub token_lifetime_hours: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_JWT_SECRET),
            token_lifetime_hours: default_token_lifetime_hours(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_JWT_SECRET
    }
}

/// How `login` reports an email that matches no account.
///
/// `NotFound` tells the caller the address is unknown, which lets anyone probe
/// for registered emails. `Unauthorized` reports the same error as a wrong
/// password and is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownEmailPolicy {
    /// Answer 404 `User not found`
    NotFound,
    /// Answer 401 `Invalid credentials`
    #[default]
    Unauthorized,
}

impl std::str::FromStr for UnknownEmailPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "not_found" | "notfound" | "404" => Ok(UnknownEmailPolicy::NotFound),
            "unauthorized" | "401" => Ok(UnknownEmailPolicy::Unauthorized),
            _ => Err(format!("Invalid unknown-email policy: {}", s)),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Token signing settings
    pub jwt: JwtConfig,

    /// bcrypt cost factor for new password hashes
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    /// Login response for unknown emails
    #[serde(default)]
    pub unknown_email: UnknownEmailPolicy,

    /// Reject logins for accounts that have not been verified
    #[serde(default = "default_require_active")]
    pub require_active: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            bcrypt_cost: default_bcrypt_cost(),
            unknown_email: UnknownEmailPolicy::default(),
            require_active: default_require_active(),
        }
    }
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            jwt: JwtConfig {
                secret: std::env::var("JWT_SECRET").unwrap_or(defaults.jwt.secret),
                token_lifetime_hours: env_or(
                    "JWT_EXPIRY_HOURS",
                    defaults.jwt.token_lifetime_hours,
                ),
            },
            bcrypt_cost: env_or("BCRYPT_COST", defaults.bcrypt_cost),
            unknown_email: env_or("LOGIN_UNKNOWN_EMAIL", defaults.unknown_email),
            require_active: env_or("LOGIN_REQUIRE_ACTIVE", defaults.require_active),
        }
    }
}

fn default_token_lifetime_hours() -> i64 {
    24
}

fn default_bcrypt_cost() -> u32 {
    DEFAULT_BCRYPT_COST
}

fn default_require_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_defaults() {
        let config = JwtConfig::default();
        assert_eq!(config.token_lifetime_hours, 24);
        assert!(config.is_using_default_secret());
        assert!(!JwtConfig::new("s3cr3t").is_using_default_secret());
    }

    #[test]
    fn test_unknown_email_policy_parsing() {
        assert_eq!(
            "not_found".parse::<UnknownEmailPolicy>().unwrap(),
            UnknownEmailPolicy::NotFound
        );
        assert_eq!(
            "UNAUTHORIZED".parse::<UnknownEmailPolicy>().unwrap(),
            UnknownEmailPolicy::Unauthorized
        );
        assert!("maybe".parse::<UnknownEmailPolicy>().is_err());
        assert_eq!(UnknownEmailPolicy::default(), UnknownEmailPolicy::Unauthorized);
    }
}
