//! Business services containing the account workflows.

pub mod auth;
pub mod credentials;
pub mod outbox;
pub mod user;

// Re-export commonly used types
pub use auth::{AuthService, AuthServiceConfig};
pub use credentials::{
    CredentialsConfig, PasswordHasher, TokenError, TokenService, MAX_PASSWORD_BYTES,
};
pub use outbox::{OutboxRelay, OutboxRelayConfig, RelayReport};
pub use user::UserService;
