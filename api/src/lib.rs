//! HTTP API for the account service
//!
//! This crate wires the core workflows to Actix-web:
//! - `routes` - request handlers for auth and user management
//! - `middleware` - request ids, JWT authentication and CORS
//! - `errors` - the Error Normalizer rendering the uniform error body
//! - `app` - the application factory shared by `main` and the tests

pub mod app;
pub mod dto;
pub mod errors;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use app::create_app;
pub use errors::{ApiError, ApiResult};
pub use state::AppState;
