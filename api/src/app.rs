//! Application factory
//!
//! Builds the Actix-web application from shared state and configuration.
//! Kept separate from `main` so integration tests can mount the same app
//! over in-memory adapters.

use std::time::Duration;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, ResponseError,
};
use tracing_actix_web::TracingLogger;

use acct_core::errors::ErrorKind;
use acct_core::events::EventPublisher;
use acct_core::repositories::{OutboxRepository, UserRepository};
use acct_shared::AppConfig;

use crate::errors::ApiError;
use crate::middleware::{create_cors, JwtAuth, RequestIdMiddleware, RequestTimeout};
use crate::routes::{auth, health, users};
use crate::state::AppState;

/// Create and configure the application with all dependencies
///
/// # Arguments
///
/// * `state` - Services shared by all workers
/// * `config` - Application configuration (CORS, payload limit, request deadline)
pub fn create_app<U, O, P>(
    state: web::Data<AppState<U, O, P>>,
    config: &AppConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    O: OutboxRepository + 'static,
    P: EventPublisher + 'static,
{
    let jwt = JwtAuth::new(state.token_service.clone());
    let cors = create_cors(config.environment, &config.cors);
    let timeout = RequestTimeout(Duration::from_secs(config.server.request_timeout));

    App::new()
        .app_data(state)
        .app_data(web::Data::new(timeout))
        .app_data(json_config(config.server.max_payload_size))
        .app_data(query_config())
        .app_data(path_config())
        // Last registered runs first
        .wrap(cors)
        .wrap(TracingLogger::default())
        .wrap(RequestIdMiddleware)
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .route("/login", web::post().to(auth::login::<U, O, P>))
                        .route("/validate-token", web::post().to(auth::validate_token::<U, O, P>)),
                )
                .service(
                    web::scope("/users")
                        .route(
                            "/verify-account",
                            web::post().to(users::verify_account::<U, O, P>),
                        )
                        .route(
                            "/me",
                            web::get()
                                .to(users::get_current_user::<U, O, P>)
                                .wrap(jwt.clone()),
                        )
                        .route(
                            "",
                            web::post()
                                .to(users::create_user::<U, O, P>)
                                .wrap(jwt.clone()),
                        )
                        .route(
                            "",
                            web::get().to(users::get_users::<U, O, P>).wrap(jwt.clone()),
                        )
                        .route(
                            "/{id}",
                            web::get().to(users::get_user_by_id::<U, O, P>).wrap(jwt),
                        ),
                ),
        )
        .default_service(web::route().to(not_found))
}

async fn not_found() -> Result<actix_web::HttpResponse, ApiError> {
    Err(ApiError::new(ErrorKind::NotFound, "Resource not found"))
}

fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            ApiError::from_status(err.status_code())
                .with_cause(&err)
                .into()
        })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::from_status(err.status_code())
            .with_cause(&err)
            .into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        ApiError::from_status(err.status_code())
            .with_cause(&err)
            .into()
    })
}
