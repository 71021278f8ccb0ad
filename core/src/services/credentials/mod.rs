//! Credential utilities: password hashing and bearer tokens.

mod config;
mod password;
mod token;

#[cfg(test)]
mod tests;

pub use config::CredentialsConfig;
pub use password::{PasswordHasher, MAX_PASSWORD_BYTES};
pub use token::{TokenError, TokenService};
