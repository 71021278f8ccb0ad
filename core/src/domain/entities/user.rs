//! User entity representing a registered account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Role assigned to an account at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Guard,
    Operator,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Guard, Role::Operator];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Guard => "guard",
            Role::Operator => "operator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("Invalid role: {}", s))
    }
}

/// A user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Login email, unique across users and compared case-sensitively
    pub email: String,

    /// bcrypt hash of the password; never serialized
    #[serde(skip_serializing, default)]
    pub password: String,

    pub role: Role,

    /// False until the account is verified
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new, inactive user with a fresh id
    pub fn new(name: String, email: String, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password: password_hash,
            role,
            is_active: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the account as verified
    pub fn activate(&mut self) {
        self.is_active = true;
        self.updated_at = Utc::now();
    }

    /// Copy of this user with the password hash cleared, for returning to callers
    pub fn sanitized(mut self) -> Self {
        self.password.clear();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new(
            "Ann".to_string(),
            "ann@x.com".to_string(),
            "$2b$04$hash".to_string(),
            Role::Admin,
        )
    }

    #[test]
    fn test_new_user_is_inactive() {
        let user = sample_user();
        assert!(!user.is_active);
        assert_eq!(user.created_at, user.updated_at);
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn test_activate() {
        let mut user = sample_user();
        user.activate();
        assert!(user.is_active);
        assert!(user.updated_at >= user.created_at);
    }

    #[test]
    fn test_password_never_serialized() {
        let user = sample_user();
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["email"], "ann@x.com");
        assert_eq!(value["role"], "admin");
        assert_eq!(value["is_active"], false);
    }

    #[test]
    fn test_sanitized_clears_password() {
        assert_eq!(sample_user().sanitized().password, "");
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("guard".parse::<Role>().unwrap(), Role::Guard);
        assert_eq!(Role::Operator.to_string(), "operator");
        assert!("Admin".parse::<Role>().is_err());
        assert!("superuser".parse::<Role>().is_err());
    }
}
