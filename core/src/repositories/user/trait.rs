//! User repository trait defining the interface for account persistence.
//!
//! Implementations report failures as [`RepositoryError`] so the workflows can
//! tell a duplicate email from an unreachable database without looking at
//! driver messages.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{OutboxEvent, User, UserPremise};
use crate::errors::RepositoryResult;

/// Everything written when an account is created
#[derive(Debug, Clone)]
pub struct Registration {
    pub user: User,

    /// Premise association to create with the user, if any
    pub premise: Option<UserPremise>,

    /// `user.created` event to deliver once the transaction commits
    pub event: OutboxEvent,
}

/// Repository trait for user and user-premise persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account atomically.
    ///
    /// The user row, the optional premise association and the outbox event are
    /// written in one transaction. The association is only inserted when no
    /// row for the same (user, premise) pair exists yet. On any failure nothing
    /// is written.
    ///
    /// # Returns
    /// * `Ok(User)` - The stored user
    /// * `Err(RepositoryError::Conflict)` - The email is already taken
    /// * `Err(RepositoryError::ConstraintViolation)` - The premise does not exist
    ///   or a column rejected its value
    /// * `Err(RepositoryError::Unavailable)` - The backend failed
    async fn register(&self, registration: Registration) -> RepositoryResult<User>;

    /// Find a user by id
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>>;

    /// Find a user by exact email
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;

    /// Users ordered by creation time, newest first
    async fn list(&self, offset: u64, limit: u32) -> RepositoryResult<Vec<User>>;

    /// Total number of users
    async fn count(&self) -> RepositoryResult<u64>;

    /// Overwrite the mutable fields of an existing user.
    ///
    /// Returns `RepositoryError::NotFound` if no row has `user.id`.
    async fn update(&self, user: User) -> RepositoryResult<User>;
}
