//! Translation of SQLx errors into repository outcomes

use sqlx::mysql::MySqlDatabaseError;

use acct_core::errors::{ConstraintKind, RepositoryError};

/// Map a driver error onto the closed [`RepositoryError`] set.
///
/// Integrity failures are classified from the MySQL error number so callers
/// never need to inspect driver text.
pub fn map_sqlx_error(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        sqlx::Error::Database(db_err) => {
            let message = db_err.message().to_string();
            let constraint = db_err.constraint().map(str::to_string);
            match db_err.try_downcast_ref::<MySqlDatabaseError>() {
                Some(mysql_err) => classify_mysql_error(mysql_err.number(), &message, constraint),
                None => RepositoryError::unavailable(message),
            }
        }
        other => RepositoryError::unavailable(other.to_string()),
    }
}

/// Classify a MySQL server error number
pub(crate) fn classify_mysql_error(
    number: u16,
    message: &str,
    constraint: Option<String>,
) -> RepositoryError {
    match number {
        // ER_DUP_KEY, ER_DUP_ENTRY
        1022 | 1062 => RepositoryError::Conflict {
            constraint: constraint.or_else(|| duplicate_key_name(message)),
        },
        // ER_ROW_IS_REFERENCED(_2), ER_NO_REFERENCED_ROW(_2)
        1216 | 1217 | 1451 | 1452 => {
            RepositoryError::violation(ConstraintKind::ForeignKey, constraint)
        }
        // ER_BAD_NULL_ERROR, ER_NO_DEFAULT_FOR_FIELD
        1048 | 1364 => RepositoryError::violation(ConstraintKind::NotNull, constraint),
        // ER_CHECK_CONSTRAINT_VIOLATED
        3819 => RepositoryError::violation(ConstraintKind::Check, constraint),
        // ER_DATA_TOO_LONG, ER_WARN_DATA_OUT_OF_RANGE, ER_TRUNCATED_WRONG_VALUE_FOR_FIELD
        1264 | 1366 | 1406 => RepositoryError::violation(ConstraintKind::Invalid, constraint),
        _ => RepositoryError::unavailable(format!("{}: {}", number, message)),
    }
}

/// Key name from `Duplicate entry '..' for key 'users.email'`
fn duplicate_key_name(message: &str) -> Option<String> {
    let (_, tail) = message.rsplit_once("for key '")?;
    tail.strip_suffix('\'').map(str::to_string)
}
