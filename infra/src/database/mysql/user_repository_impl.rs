//! MySQL implementation of the UserRepository trait.
//!
//! Registration writes the user row, the optional premise association and
//! the outbox row inside a single transaction.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlConnection, MySqlPool};
use tracing::debug;
use uuid::Uuid;

use acct_core::domain::entities::{Role, User, UserPremise};
use acct_core::errors::{RepositoryError, RepositoryResult};
use acct_core::repositories::{Registration, UserRepository};

use super::outbox_repository_impl::insert_event;
use super::{column, uuid_column};
use crate::database::error::map_sqlx_error;

const USER_COLUMNS: &str =
    "id, name, email, password, role, is_active, created_at, updated_at";

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to User entity
    fn row_to_user(row: &MySqlRow) -> RepositoryResult<User> {
        let role: String = column(row, "role")?;
        Ok(User {
            id: uuid_column(row, "id")?,
            name: column(row, "name")?,
            email: column(row, "email")?,
            password: column(row, "password")?,
            role: role
                .parse::<Role>()
                .map_err(RepositoryError::unavailable)?,
            is_active: column(row, "is_active")?,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
        })
    }

    async fn insert_user(conn: &mut MySqlConnection, user: &User) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password, role, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.role.as_str())
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Insert the association unless the pair is already present
    async fn assign_premise(
        conn: &mut MySqlConnection,
        premise: &UserPremise,
    ) -> Result<(), sqlx::Error> {
        let existing = sqlx::query(
            "SELECT id FROM user_premises WHERE user_id = ? AND premise_id = ? LIMIT 1",
        )
        .bind(premise.user_id.to_string())
        .bind(premise.premise_id.to_string())
        .fetch_optional(&mut *conn)
        .await?;

        if existing.is_some() {
            debug!(user_id = %premise.user_id, premise_id = %premise.premise_id, "Premise already assigned");
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO user_premises (id, user_id, premise_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(premise.id.to_string())
        .bind(premise.user_id.to_string())
        .bind(premise.premise_id.to_string())
        .bind(premise.created_at)
        .bind(premise.updated_at)
        .execute(conn)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn register(&self, registration: Registration) -> RepositoryResult<User> {
        let Registration {
            user,
            premise,
            event,
        } = registration;

        // Dropping the transaction on any early return rolls it back
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        Self::insert_user(&mut tx, &user)
            .await
            .map_err(map_sqlx_error)?;
        if let Some(premise) = &premise {
            Self::assign_premise(&mut tx, premise)
                .await
                .map_err(map_sqlx_error)?;
        }
        insert_event(&mut tx, &event).await.map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        debug!(user_id = %user.id, event_id = %event.id, "Registration committed");
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE id = ? LIMIT 1", USER_COLUMNS);

        sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .as_ref()
            .map(Self::row_to_user)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE email = ? LIMIT 1", USER_COLUMNS);

        sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?
            .as_ref()
            .map(Self::row_to_user)
            .transpose()
    }

    async fn list(&self, offset: u64, limit: u32) -> RepositoryResult<Vec<User>> {
        let query = format!(
            "SELECT {} FROM users ORDER BY created_at DESC, id LIMIT ? OFFSET ?",
            USER_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter().map(Self::row_to_user).collect()
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn update(&self, mut user: User) -> RepositoryResult<User> {
        user.updated_at = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE users SET
                name = ?,
                email = ?,
                password = ?,
                role = ?,
                is_active = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.role.as_str())
        .bind(user.is_active)
        .bind(user.updated_at)
        .bind(user.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(user)
    }
}
