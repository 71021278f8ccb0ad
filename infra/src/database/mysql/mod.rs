//! MySQL repository implementations

pub mod outbox_repository_impl;
pub mod user_repository_impl;

pub use outbox_repository_impl::MySqlOutboxRepository;
pub use user_repository_impl::MySqlUserRepository;

use sqlx::mysql::MySqlRow;
use sqlx::Row;
use uuid::Uuid;

use acct_core::errors::RepositoryError;

/// Read a column, reporting decode failures as repository errors
pub(crate) fn column<'r, T>(row: &'r MySqlRow, name: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, sqlx::MySql> + sqlx::Type<sqlx::MySql>,
{
    row.try_get(name)
        .map_err(|e| RepositoryError::unavailable(format!("Failed to get {}: {}", name, e)))
}

/// Read a `CHAR(36)` id column
pub(crate) fn uuid_column(row: &MySqlRow, name: &str) -> Result<Uuid, RepositoryError> {
    let raw: String = column(row, name)?;
    Uuid::parse_str(&raw)
        .map_err(|e| RepositoryError::unavailable(format!("Invalid UUID in {}: {}", name, e)))
}
