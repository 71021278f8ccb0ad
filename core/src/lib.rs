//! # Account Core
//!
//! Core business logic and domain layer for the account service.
//! This crate contains domain entities, workflow services, repository and
//! publisher contracts, and the error taxonomy shared by every layer above it.

pub mod context;
pub mod domain;
pub mod errors;
pub mod events;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use context::{DeadlineExceeded, RequestContext};
pub use domain::*;
pub use errors::*;
pub use events::{EventPublisher, PublishError};
pub use repositories::{OutboxRepository, Registration, UserRepository};
pub use services::{
    AuthService, AuthServiceConfig, CredentialsConfig, OutboxRelay, OutboxRelayConfig,
    PasswordHasher, RelayReport, TokenError, TokenService, UserService,
};
