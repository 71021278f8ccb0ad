//! Bearer token claims.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::Role;

/// Lifetime of every issued token
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Id of the user the token was issued to
    pub user_id: String,

    /// Role of the user at issuance
    pub role: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,
}

impl Claims {
    /// Claims for `user_id` issued at `issued_at` and valid for `lifetime`
    pub fn new(user_id: Uuid, role: Role, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
        Self {
            user_id: user_id.to_string(),
            role: role.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + lifetime).timestamp(),
        }
    }

    /// Parses the user id claim
    pub fn user_uuid(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.user_id)
    }

    /// Whether the token is still valid at `now`; expiry itself is exclusive
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() < self.exp
    }
}
