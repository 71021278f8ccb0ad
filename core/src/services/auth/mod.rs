//! Authentication service module
//!
//! Email/password login and stateless bearer token validation.

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use service::AuthService;
