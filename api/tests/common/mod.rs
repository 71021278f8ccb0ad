//! Shared fixtures for the HTTP integration tests

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use uuid::Uuid;

use acct_api::AppState;
use acct_core::domain::entities::{Role, User};
use acct_core::events::RecordingPublisher;
use acct_core::repositories::InMemoryRepository;
use acct_core::services::{
    AuthService, AuthServiceConfig, CredentialsConfig, OutboxRelay, OutboxRelayConfig,
    PasswordHasher, TokenService, UserService,
};
use acct_shared::AppConfig;

pub type TestState = AppState<InMemoryRepository, InMemoryRepository, RecordingPublisher>;

pub const PASSWORD: &str = "secret1";

/// In-memory adapters plus the state built over them
pub struct TestContext {
    pub config: AppConfig,
    pub repo: InMemoryRepository,
    pub publisher: RecordingPublisher,
    pub tokens: Arc<TokenService>,
    pub state: web::Data<TestState>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let repo = InMemoryRepository::new();
        let publisher = RecordingPublisher::new();
        let tokens = Arc::new(TokenService::new(&CredentialsConfig::from(&config.auth)));
        let hasher = PasswordHasher::new(4);

        let relay = Arc::new(OutboxRelay::new(
            Arc::new(repo.clone()),
            Arc::new(publisher.clone()),
            OutboxRelayConfig::from(&config.events),
        ));
        let auth_service = AuthService::new(
            Arc::new(repo.clone()),
            hasher,
            tokens.clone(),
            AuthServiceConfig::from(&config.auth),
        );
        let user_service = UserService::new(Arc::new(repo.clone()), relay, hasher, tokens.clone());
        let state = web::Data::new(AppState::new(auth_service, user_service, tokens.clone()));

        Self {
            config,
            repo,
            publisher,
            tokens,
            state,
        }
    }

    /// Insert a user with [`PASSWORD`] directly into the store
    pub async fn seed_user(&self, email: &str, active: bool) -> User {
        let hash = PasswordHasher::new(4).hash(PASSWORD).unwrap();
        let mut user = User::new("Ann".to_string(), email.to_string(), hash, Role::Admin);
        if active {
            user.activate();
        }
        self.repo.insert_user(user.clone()).await;
        user
    }

    /// `Authorization` header value for `user_id`
    pub fn bearer(&self, user_id: Uuid) -> String {
        format!("Bearer {}", self.tokens.issue_token(user_id, Role::Admin).unwrap())
    }
}
