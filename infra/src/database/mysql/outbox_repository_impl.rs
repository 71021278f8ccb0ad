//! MySQL implementation of the OutboxRepository trait.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlConnection, MySqlPool};
use uuid::Uuid;

use acct_core::domain::entities::OutboxEvent;
use acct_core::errors::{RepositoryError, RepositoryResult};
use acct_core::repositories::OutboxRepository;

use super::{column, uuid_column};
use crate::database::error::map_sqlx_error;

/// MySQL implementation of OutboxRepository
pub struct MySqlOutboxRepository {
    pool: MySqlPool,
}

impl MySqlOutboxRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_event(row: &MySqlRow) -> RepositoryResult<OutboxEvent> {
        Ok(OutboxEvent {
            id: uuid_column(row, "id")?,
            topic: column(row, "topic")?,
            key: column(row, "event_key")?,
            payload: column(row, "payload")?,
            attempts: column(row, "attempts")?,
            last_error: column(row, "last_error")?,
            created_at: column(row, "created_at")?,
            published_at: column(row, "published_at")?,
        })
    }
}

/// Append an event row on an open connection or transaction
pub(crate) async fn insert_event(
    conn: &mut MySqlConnection,
    event: &OutboxEvent,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO outbox_events
            (id, topic, event_key, payload, attempts, last_error, created_at, published_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(event.id.to_string())
    .bind(&event.topic)
    .bind(&event.key)
    .bind(&event.payload)
    .bind(event.attempts)
    .bind(&event.last_error)
    .bind(event.created_at)
    .bind(event.published_at)
    .execute(conn)
    .await?;
    Ok(())
}

#[async_trait]
impl OutboxRepository for MySqlOutboxRepository {
    async fn pending(&self, limit: u32, max_attempts: u32) -> RepositoryResult<Vec<OutboxEvent>> {
        let rows = sqlx::query(
            r#"
            SELECT id, topic, event_key, payload, attempts, last_error, created_at, published_at
            FROM outbox_events
            WHERE published_at IS NULL AND attempts < ?
            ORDER BY created_at
            LIMIT ?
            "#,
        )
        .bind(max_attempts)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(Self::row_to_event).collect()
    }

    async fn mark_published(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("UPDATE outbox_events SET published_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn record_failure(&self, id: Uuid, error: &str) -> RepositoryResult<()> {
        let result = sqlx::query(
            "UPDATE outbox_events SET attempts = attempts + 1, last_error = ? WHERE id = ?",
        )
        .bind(error)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
