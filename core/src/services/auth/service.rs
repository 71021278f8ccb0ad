//! Main authentication service implementation

use std::sync::Arc;

use acct_shared::UnknownEmailPolicy;
use tracing::{debug, info, instrument, warn};

use crate::context::RequestContext;
use crate::domain::value_objects::{LoginResponse, TokenValidation};
use crate::errors::{AppError, AppResult};
use crate::repositories::UserRepository;
use crate::services::credentials::{PasswordHasher, TokenService};

use super::config::AuthServiceConfig;

/// Login and token validation
pub struct AuthService<U>
where
    U: UserRepository,
{
    /// User repository for account lookups
    user_repository: Arc<U>,
    /// Password hashing
    password_hasher: PasswordHasher,
    /// Token signing and verification
    token_service: Arc<TokenService>,
    /// Service configuration
    config: AuthServiceConfig,
    /// Checked against on unknown emails so both login paths pay for bcrypt
    dummy_hash: Option<String>,
}

impl<U> AuthService<U>
where
    U: UserRepository,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Repository for user lookups
    /// * `password_hasher` - bcrypt hasher used to check passwords
    /// * `token_service` - Service issuing and verifying bearer tokens
    /// * `config` - Login policy
    pub fn new(
        user_repository: Arc<U>,
        password_hasher: PasswordHasher,
        token_service: Arc<TokenService>,
        config: AuthServiceConfig,
    ) -> Self {
        let dummy_hash = match password_hasher.hash("unknown-account") {
            Ok(hash) => Some(hash),
            Err(e) => {
                warn!(error = %e, "Could not prepare hash for unknown-email logins");
                None
            }
        };
        Self {
            user_repository,
            password_hasher,
            token_service,
            config,
            dummy_hash,
        }
    }

    #[cfg(test)]
    pub(crate) fn dummy_hash(&self) -> Option<&str> {
        self.dummy_hash.as_deref()
    }

    /// Authenticate with email and password
    ///
    /// This method:
    /// 1. Looks up the account by email
    /// 2. Verifies the password against the stored hash
    /// 3. Rejects inactive accounts when `require_active` is set
    /// 4. Issues a bearer token
    ///
    /// # Returns
    ///
    /// * `Ok(LoginResponse)` - Token for the authenticated user
    /// * `Err(AppError)` - `Unauthorized` for bad credentials or an inactive
    ///   account, `NotFound` for an unknown email when the policy says so,
    ///   `Database`/`Timeout` when the lookup fails
    #[instrument(skip(self, ctx, password), fields(request_id = %ctx.request_id()))]
    pub async fn login(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> AppResult<LoginResponse> {
        // Step 1: Find the account
        let user = ctx
            .bounded(self.user_repository.find_by_email(email))
            .await?
            .map_err(|e| AppError::database("get user by email", e))?;

        let user = match user {
            Some(user) => user,
            None => {
                debug!("Login attempted for unknown email");
                if let Some(hash) = &self.dummy_hash {
                    let _ = self
                        .password_hasher
                        .verify_blocking(hash.clone(), password.to_string())
                        .await;
                }
                return Err(match self.config.unknown_email {
                    UnknownEmailPolicy::NotFound => AppError::not_found("User"),
                    UnknownEmailPolicy::Unauthorized => {
                        AppError::unauthorized("Invalid credentials")
                    }
                });
            }
        };

        // Step 2: Check the password
        if let Err(err) = self
            .password_hasher
            .verify_blocking(user.password.clone(), password.to_string())
            .await
        {
            warn!(user_id = %user.id, "Login rejected: password check failed");
            return Err(err);
        }

        // Step 3: Account must be verified
        if self.config.require_active && !user.is_active {
            warn!(user_id = %user.id, "Login rejected: account not active");
            return Err(AppError::unauthorized("Account is not active"));
        }

        // Step 4: Issue token
        let token = self.token_service.issue_token(user.id, user.role)?;
        info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse { token })
    }

    /// Check that a token is well formed, correctly signed and unexpired.
    ///
    /// Stateless: the account behind the token is not looked up, so a token for
    /// a deleted user stays valid until it expires.
    #[instrument(skip(self, ctx, token), fields(request_id = %ctx.request_id()))]
    pub async fn validate_token(
        &self,
        ctx: &RequestContext,
        token: &str,
    ) -> AppResult<TokenValidation> {
        self.token_service.parse_token(token).map_err(|e| {
            debug!(reason = %e, "Token rejected");
            AppError::unauthorized("Invalid or expired token").with_source(e)
        })?;

        Ok(TokenValidation { valid: true })
    }
}
