//! Route handlers
//!
//! - `auth` - login and token validation
//! - `users` - account creation, verification and lookup
//! - `health` - liveness probe

pub mod auth;
pub mod health;
pub mod users;
