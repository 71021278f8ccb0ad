//! User route handlers

use actix_web::{web, HttpResponse};
use validator::{Validate, ValidationErrors};

use acct_core::errors::ErrorKind;
use acct_core::events::EventPublisher;
use acct_core::repositories::{OutboxRepository, UserRepository};
use acct_shared::{ApiResponse, Pagination};

use crate::dto::{CreateUserRequest, TokenRequest};
use crate::errors::{ApiError, ApiResult};
use crate::middleware::{AuthContext, RequestCtx};
use crate::state::AppState;

/// Handler for POST /api/v1/users
///
/// Creates an inactive account and emits `user.created` carrying the
/// verification token.
///
/// # Request Body
///
/// ```json
/// {
///     "name": "Ann",
///     "email": "ann@x.com",
///     "password": "secret1",
///     "role": "admin",
///     "premise_id": "6f1c..."
/// }
/// ```
///
/// ## Errors
/// - 400 Validation error, malformed or unknown premise id
/// - 401 Missing or invalid bearer token
/// - 409 Email already registered
pub async fn create_user<U, O, P>(
    RequestCtx(ctx): RequestCtx,
    _caller: AuthContext,
    state: web::Data<AppState<U, O, P>>,
    request: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    O: OutboxRepository + 'static,
    P: EventPublisher + 'static,
{
    request.validate()?;

    let new_user = request.into_inner().into_new_user().map_err(|e| {
        let mut errors = ValidationErrors::new();
        errors.add("role", e);
        ApiError::from(errors)
    })?;
    let user = state.user_service.create_user(&ctx, new_user).await?;

    Ok(HttpResponse::Created().json(ApiResponse::new(201, user)))
}

/// Handler for POST /api/v1/users/verify-account
pub async fn verify_account<U, O, P>(
    RequestCtx(ctx): RequestCtx,
    state: web::Data<AppState<U, O, P>>,
    request: web::Json<TokenRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    O: OutboxRepository + 'static,
    P: EventPublisher + 'static,
{
    request.validate()?;

    state.user_service.verify_account(&ctx, &request.token).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("success")))
}

/// Handler for GET /api/v1/users?page=&limit=
pub async fn get_users<U, O, P>(
    RequestCtx(ctx): RequestCtx,
    _caller: AuthContext,
    state: web::Data<AppState<U, O, P>>,
    query: web::Query<Pagination>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    O: OutboxRepository + 'static,
    P: EventPublisher + 'static,
{
    let page = state.user_service.get_users(&ctx, query.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(page)))
}

/// Handler for GET /api/v1/users/me
pub async fn get_current_user<U, O, P>(
    RequestCtx(ctx): RequestCtx,
    caller: AuthContext,
    state: web::Data<AppState<U, O, P>>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    O: OutboxRepository + 'static,
    P: EventPublisher + 'static,
{
    let user = state
        .user_service
        .get_user_by_id(&ctx, &caller.user_id.to_string())
        .await
        .map_err(|e| match e.kind() {
            // The token outlived its account
            ErrorKind::NotFound => ApiError::unauthorized("Account no longer exists"),
            _ => ApiError::from(e),
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}

/// Handler for GET /api/v1/users/{id}
pub async fn get_user_by_id<U, O, P>(
    RequestCtx(ctx): RequestCtx,
    _caller: AuthContext,
    state: web::Data<AppState<U, O, P>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    O: OutboxRepository + 'static,
    P: EventPublisher + 'static,
{
    let user = state.user_service.get_user_by_id(&ctx, &path).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}
