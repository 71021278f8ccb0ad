//! Password hashing with bcrypt

use crate::errors::{AppError, AppResult};

/// bcrypt only reads this many bytes of input
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Salted one-way password hashing.
///
/// bcrypt is CPU bound; the async helpers move the work onto the blocking pool
/// and await it before returning.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash `plaintext`. Empty passwords and passwords longer than
    /// [`MAX_PASSWORD_BYTES`] are rejected.
    pub fn hash(&self, plaintext: &str) -> AppResult<String> {
        if plaintext.is_empty() {
            return Err(AppError::internal("Failed to hash password: password is empty"));
        }
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(AppError::internal(
                "Failed to hash password: password length exceeds 72 bytes",
            ));
        }
        bcrypt::hash(plaintext, self.cost)
            .map_err(|e| AppError::internal("Failed to hash password").with_source(e))
    }

    /// Check `plaintext` against a stored hash.
    ///
    /// A mismatch is `Unauthorized`; a hash that cannot be parsed is `Internal`.
    pub fn verify(&self, hash: &str, plaintext: &str) -> AppResult<()> {
        // Never stored, and bcrypt would compare only its prefix
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(AppError::unauthorized("Invalid credentials"));
        }
        match bcrypt::verify(plaintext, hash) {
            Ok(true) => Ok(()),
            Ok(false) => Err(AppError::unauthorized("Invalid credentials")),
            Err(e) => Err(AppError::internal("Failed to verify password").with_source(e)),
        }
    }

    pub async fn hash_blocking(&self, plaintext: String) -> AppResult<String> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| AppError::internal("Failed to hash password").with_source(e))?
    }

    pub async fn verify_blocking(&self, hash: String, plaintext: String) -> AppResult<()> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&hash, &plaintext))
            .await
            .map_err(|e| AppError::internal("Failed to verify password").with_source(e))?
    }
}
