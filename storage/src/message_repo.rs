//! Message repository: persistence and queries for archived messages.
//!
//! Uses SqlitePoolManager and the models (NewSingleMessage, NewGroupMessage, PersistedMessage,
//! MessageQuery). Implements [`MessageStore`] for the ingest pipeline; the read methods back the CLI.

use crate::error::StorageError;
use crate::models::{MessageQuery, MessageRow, NewGroupMessage, NewSingleMessage, PersistedMessage};
use crate::repository::MessageStore;
use crate::sqlite_pool::SqlitePoolManager;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{error, info, instrument};

const SELECT_COLUMNS: &str =
    "SELECT id, message_id, text, media_type, media_url, media_group_id, created_at FROM messages";

#[derive(Clone)]
pub struct MessageRepository {
    pool_manager: SqlitePoolManager,
}

impl MessageRepository {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating database tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                message_id INTEGER NOT NULL,
                text TEXT,
                media_type TEXT,
                media_url TEXT,
                media_group_id TEXT,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_messages_message_id ON messages(message_id);
            CREATE INDEX IF NOT EXISTS idx_messages_created_at ON messages(created_at);
            CREATE INDEX IF NOT EXISTS idx_messages_media_group_id ON messages(media_group_id);
            "#,
        )
        .execute(pool)
        .await?;

        info!("Database tables created successfully");
        Ok(())
    }

    /// Inserts one row and returns the assigned id. A `None` timestamp leaves `created_at` to
    /// the column default.
    async fn insert_row(
        &self,
        message_id: i64,
        text: &str,
        media_type: Option<&str>,
        media_url: Option<&str>,
        media_group_id: Option<&str>,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<i64, StorageError> {
        let pool = self.pool_manager.pool();

        let result = match timestamp {
            Some(ts) => {
                sqlx::query(
                    r#"
                    INSERT INTO messages (message_id, text, media_type, media_url, media_group_id, created_at)
                    VALUES (?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(message_id)
                .bind(text)
                .bind(media_type)
                .bind(media_url)
                .bind(media_group_id)
                .bind(ts.naive_utc())
                .execute(pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO messages (message_id, text, media_type, media_url, media_group_id)
                    VALUES (?, ?, ?, ?, ?)
                    "#,
                )
                .bind(message_id)
                .bind(text)
                .bind(media_type)
                .bind(media_url)
                .bind(media_group_id)
                .execute(pool)
                .await?
            }
        };

        Ok(result.last_insert_rowid())
    }

    pub async fn get_messages(
        &self,
        query: &MessageQuery,
    ) -> Result<Vec<PersistedMessage>, StorageError> {
        let pool = self.pool_manager.pool();
        let mut sql = format!("{} WHERE 1=1", SELECT_COLUMNS);

        if query.message_id.is_some() {
            sql.push_str(" AND message_id = ?");
        }
        if query.groups_only {
            sql.push_str(" AND media_group_id IS NOT NULL");
        }

        // LIMIT -1 means no limit in SQLite.
        sql.push_str(" ORDER BY created_at DESC, id DESC LIMIT ?");

        let mut query_builder = sqlx::query_as::<_, MessageRow>(&sql);
        if let Some(message_id) = query.message_id {
            query_builder = query_builder.bind(message_id);
        }
        query_builder = query_builder.bind(query.limit.unwrap_or(-1));

        let rows = query_builder.fetch_all(pool).await?;
        info!("Retrieved {} messages", rows.len());

        Ok(rows.into_iter().map(PersistedMessage::from).collect())
    }

    pub async fn get_message_by_id(&self, id: i64) -> Result<Option<PersistedMessage>, StorageError> {
        let pool = self.pool_manager.pool();

        let row = sqlx::query_as::<_, MessageRow>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(PersistedMessage::from))
    }

    /// Round-trips a trivial query to verify the pool can still reach the database.
    pub async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1")
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }
}

#[async_trait]
impl MessageStore for MessageRepository {
    #[instrument(skip(self, message), fields(message_id = message.message_id))]
    async fn insert_single(&self, message: &NewSingleMessage) -> Result<i64, StorageError> {
        let id = self
            .insert_row(
                message.message_id,
                &message.text,
                message.media_type.as_deref(),
                message.media_url.as_deref(),
                None,
                message.timestamp,
            )
            .await
            .map_err(|e| {
                error!(error = %e, message_id = message.message_id, "Failed to save message");
                e
            })?;

        info!(message_id = message.message_id, id, "Saved message");
        Ok(id)
    }

    #[instrument(skip(self, message), fields(media_group_id = %message.media_group_id))]
    async fn insert_group(&self, message: &NewGroupMessage) -> Result<i64, StorageError> {
        // Empty sequences are stored as NULL and read back as empty sequences.
        let media_types = if message.media_types.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&message.media_types)?)
        };
        let media_urls = if message.media_urls.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&message.media_urls)?)
        };

        let id = self
            .insert_row(
                message.message_id,
                &message.text,
                media_types.as_deref(),
                media_urls.as_deref(),
                Some(message.media_group_id.as_str()),
                message.timestamp,
            )
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    media_group_id = %message.media_group_id,
                    "Failed to save media group"
                );
                e
            })?;

        info!(
            media_group_id = %message.media_group_id,
            id,
            parts = message.media_urls.len(),
            "Saved media group"
        );
        Ok(id)
    }
}
