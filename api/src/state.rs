//! Shared application state

use std::sync::Arc;

use acct_core::events::EventPublisher;
use acct_core::repositories::{OutboxRepository, UserRepository};
use acct_core::services::{AuthService, TokenService, UserService};

/// Services shared by every worker
pub struct AppState<U, O, P>
where
    U: UserRepository,
    O: OutboxRepository,
    P: EventPublisher,
{
    pub auth_service: Arc<AuthService<U>>,
    pub user_service: Arc<UserService<U, O, P>>,
    pub token_service: Arc<TokenService>,
}

impl<U, O, P> AppState<U, O, P>
where
    U: UserRepository,
    O: OutboxRepository,
    P: EventPublisher,
{
    pub fn new(
        auth_service: AuthService<U>,
        user_service: UserService<U, O, P>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            auth_service: Arc::new(auth_service),
            user_service: Arc::new(user_service),
            token_service,
        }
    }
}
