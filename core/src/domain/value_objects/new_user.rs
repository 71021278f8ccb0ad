//! Input for account registration.

use crate::domain::entities::Role;

/// A validated registration request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    /// Plaintext password; hashed before anything is stored
    pub password: String,
    pub role: Role,
    /// Optional premise to associate; empty is treated as absent
    pub premise_id: Option<String>,
}
