use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::repository::{ProgressSlotRepository, StorageError, StoredSlot};

use super::SqliteRepository;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl ProgressSlotRepository for SqliteRepository {
    async fn read_slot(&self, name: &str) -> Result<Option<StoredSlot>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT name, contents, saved_at
            FROM progress_slots
            WHERE name = ?1
            ",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let saved_at: DateTime<Utc> = row.try_get("saved_at").map_err(ser)?;
        Ok(Some(StoredSlot {
            name: row.try_get("name").map_err(ser)?,
            contents: row.try_get("contents").map_err(ser)?,
            saved_at,
        }))
    }

    async fn write_slot(
        &self,
        name: &str,
        contents: &str,
        saved_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO progress_slots (name, contents, saved_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(name) DO UPDATE SET
                contents = excluded.contents,
                saved_at = excluded.saved_at
            ",
        )
        .bind(name)
        .bind(contents)
        .bind(saved_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        tracing::debug!(slot = name, bytes = contents.len(), "wrote progress slot");
        Ok(())
    }

    async fn clear_slot(&self, name: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM progress_slots WHERE name = ?1")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(result.rows_affected() > 0)
    }
}
