//! Account registration, verification and lookup

use std::sync::Arc;

use acct_shared::{PaginatedResponse, Pagination};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::context::RequestContext;
use crate::domain::entities::{User, UserPremise};
use crate::domain::events::EventEnvelope;
use crate::domain::value_objects::NewUser;
use crate::errors::{AppError, AppResult, ConstraintKind, RepositoryError};
use crate::events::EventPublisher;
use crate::repositories::{OutboxRepository, Registration, UserRepository};
use crate::services::credentials::{PasswordHasher, TokenService};
use crate::services::outbox::OutboxRelay;

/// User account workflows
pub struct UserService<U, O, P>
where
    U: UserRepository,
    O: OutboxRepository,
    P: EventPublisher,
{
    /// User repository for account persistence
    user_repository: Arc<U>,
    /// Relay used for the first delivery attempt of new events
    relay: Arc<OutboxRelay<O, P>>,
    /// Password hashing
    password_hasher: PasswordHasher,
    /// Token signing and verification
    token_service: Arc<TokenService>,
}

impl<U, O, P> UserService<U, O, P>
where
    U: UserRepository,
    O: OutboxRepository,
    P: EventPublisher,
{
    /// Create a new user service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Repository for account persistence
    /// * `relay` - Outbox relay shared with the background delivery loop
    /// * `password_hasher` - bcrypt hasher for new passwords
    /// * `token_service` - Service issuing and verifying bearer tokens
    pub fn new(
        user_repository: Arc<U>,
        relay: Arc<OutboxRelay<O, P>>,
        password_hasher: PasswordHasher,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            user_repository,
            relay,
            password_hasher,
            token_service,
        }
    }

    /// Register a new, inactive account
    ///
    /// This method:
    /// 1. Hashes the password
    /// 2. Parses the premise id, if one was given
    /// 3. Issues the account's first token and builds the `user.created` event
    /// 4. Stores user, premise association and event in one transaction
    /// 5. Tries to publish the event once; on failure the outbox relay retries
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - The stored user with the password cleared
    /// * `Err(AppError)` - `BadRequest` for a malformed or unknown premise,
    ///   `Conflict` for a taken email, `Internal` for hashing/signing/encoding
    ///   failures, `Database`/`Timeout` for persistence failures
    #[instrument(skip(self, ctx, new_user), fields(request_id = %ctx.request_id(), role = %new_user.role))]
    pub async fn create_user(&self, ctx: &RequestContext, new_user: NewUser) -> AppResult<User> {
        let NewUser {
            name,
            email,
            password,
            role,
            premise_id,
        } = new_user;

        // Step 1: Hash password
        let password_hash = self.password_hasher.hash_blocking(password).await?;

        // Step 2: Validate premise id before anything is written
        let premise_id = match premise_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                Uuid::parse_str(raw)
                    .map_err(|e| AppError::bad_request("Invalid premise id").with_source(e))?,
            ),
        };

        // Step 3: Build records, token and event
        let user = User::new(name, email, password_hash, role);
        let premise = premise_id.map(|premise_id| UserPremise::new(user.id, premise_id));
        let token = self.token_service.issue_token(user.id, user.role)?;
        let event = EventEnvelope::user_created(&token, &user.email)
            .into_outbox(user.id)
            .map_err(|e| AppError::internal("Failed to marshal message").with_source(e))?;

        // Step 4: Persist atomically
        let registration = Registration {
            user,
            premise,
            event: event.clone(),
        };
        let user = ctx
            .bounded(self.user_repository.register(registration))
            .await?
            .map_err(|e| match e {
                RepositoryError::Conflict { .. } => {
                    AppError::conflict("User with this email already exists").with_source(e)
                }
                RepositoryError::ConstraintViolation {
                    violation: ConstraintKind::ForeignKey,
                    ..
                } => AppError::bad_request("Premise does not exist").with_source(e),
                other => AppError::database("create user", other),
            })?;

        info!(user_id = %user.id, "User created");

        // Step 5: First delivery attempt
        if let Err(e) = self.relay.deliver(ctx, &event).await {
            warn!(user_id = %user.id, error = %e, "user.created left in outbox for retry");
        }

        Ok(user.sanitized())
    }

    /// Activate the account a verification token was issued for.
    ///
    /// Verifying an already active account succeeds without writing.
    #[instrument(skip(self, ctx, token), fields(request_id = %ctx.request_id()))]
    pub async fn verify_account(&self, ctx: &RequestContext, token: &str) -> AppResult<()> {
        let claims = self
            .token_service
            .parse_token(token)
            .map_err(|e| AppError::bad_request("Invalid token").with_source(e))?;
        let user_id = claims
            .user_uuid()
            .map_err(|e| AppError::bad_request("Invalid token").with_source(e))?;

        let mut user = ctx
            .bounded(self.user_repository.find_by_id(user_id))
            .await?
            .map_err(|e| AppError::database("get user by id", e))?
            .ok_or_else(|| AppError::not_found("User"))?;

        if user.is_active {
            debug!(user_id = %user.id, "Account already active");
            return Ok(());
        }

        user.activate();
        ctx.bounded(self.user_repository.update(user))
            .await?
            .map_err(|e| match e {
                RepositoryError::NotFound => AppError::not_found("User"),
                other => AppError::database("update user", other),
            })?;

        info!(user_id = %user_id, "Account verified");
        Ok(())
    }

    /// One page of users, newest first
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id()))]
    pub async fn get_users(
        &self,
        ctx: &RequestContext,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<User>> {
        if !pagination.is_valid() {
            let message = if pagination.page < 1 {
                "Invalid page number"
            } else {
                "Invalid limit"
            };
            return Err(AppError::bad_request(message));
        }

        let users = ctx
            .bounded(self.user_repository.list(pagination.offset(), pagination.limit))
            .await?
            .map_err(|e| AppError::database("get users", e))?;
        let total = ctx
            .bounded(self.user_repository.count())
            .await?
            .map_err(|e| AppError::database("get users count", e))?;

        Ok(PaginatedResponse::new(users, pagination, total).map(User::sanitized))
    }

    /// A single user by id
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id()))]
    pub async fn get_user_by_id(&self, ctx: &RequestContext, id: &str) -> AppResult<User> {
        let id = Uuid::parse_str(id)
            .map_err(|e| AppError::bad_request("Invalid user id").with_source(e))?;

        ctx.bounded(self.user_repository.find_by_id(id))
            .await?
            .map_err(|e| AppError::database("get user by id", e))?
            .map(User::sanitized)
            .ok_or_else(|| AppError::not_found("User"))
    }
}
