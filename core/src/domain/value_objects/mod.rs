//! Value objects representing immutable domain concepts.

pub mod auth_response;
pub mod new_user;

// Re-export commonly used types
pub use auth_response::{LoginResponse, TokenValidation};
pub use new_user::NewUser;
