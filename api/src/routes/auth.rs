//! Authentication route handlers

use actix_web::{web, HttpResponse};
use validator::Validate;

use acct_core::events::EventPublisher;
use acct_core::repositories::{OutboxRepository, UserRepository};
use acct_shared::ApiResponse;

use crate::dto::{LoginRequest, TokenRequest};
use crate::errors::ApiResult;
use crate::middleware::RequestCtx;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/login
///
/// # Request Body
///
/// ```json
/// { "email": "ann@x.com", "password": "secret1" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "status": 200, "code": "0000", "data": { "token": "eyJhbGciOiJIUzI1NiIs..." } }
/// ```
///
/// ## Errors
/// - 400 Validation error: malformed body
/// - 401 Unauthorized: wrong credentials or inactive account
/// - 404 Not found: unknown email, when configured to reveal it
pub async fn login<U, O, P>(
    RequestCtx(ctx): RequestCtx,
    state: web::Data<AppState<U, O, P>>,
    request: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    O: OutboxRepository + 'static,
    P: EventPublisher + 'static,
{
    request.validate()?;

    let response = state
        .auth_service
        .login(&ctx, &request.email, &request.password)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(response)))
}

/// Handler for POST /api/v1/auth/validate-token
///
/// Responds `{ "valid": true }` for a token with a good signature that has
/// not expired, 401 otherwise.
pub async fn validate_token<U, O, P>(
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

    let validation = state.auth_service.validate_token(&ctx, &request.token).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(validation)))
}
