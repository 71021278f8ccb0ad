//! Request and response bodies

pub mod auth_dto;
pub mod user_dto;

pub use auth_dto::{LoginRequest, TokenRequest};
pub use user_dto::CreateUserRequest;
