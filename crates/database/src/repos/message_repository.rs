//! Repository for message data access operations.

use crate::entities::{ChatMessage, CreateMessageRequest, ReactionMap};
use crate::repos::ReactionRepository;
use crate::timestamp_now;
use crate::types::DatabaseResult;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;

const MESSAGE_COLUMNS: &str = "id, public_id, event_id, sender_id, sender_name, content, created_at";

/// Repository for message database operations
#[derive(Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
    reactions: ReactionRepository,
}

impl MessageRepository {
    /// Create a new message repository
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            reactions: ReactionRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new message
    pub async fn create(&self, request: &CreateMessageRequest) -> DatabaseResult<ChatMessage> {
        let public_id = cuid2::cuid();
        let now = timestamp_now();

        let result = sqlx::query(
            "INSERT INTO messages (public_id, event_id, sender_id, sender_name, content, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(&request.event_id)
        .bind(&request.sender_id)
        .bind(&request.sender_name)
        .bind(&request.content)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let message_id = result.last_insert_rowid();

        info!(
            message_id = message_id,
            public_id = %public_id,
            event_id = %request.event_id,
            sender_id = %request.sender_id,
            "created new message"
        );

        Ok(ChatMessage {
            id: message_id,
            public_id,
            event_id: request.event_id.clone(),
            sender_id: request.sender_id.clone(),
            sender_name: request.sender_name.clone(),
            content: request.content.clone(),
            created_at: now,
            reactions: ReactionMap::new(),
        })
    }

    /// Find a message by its public ID, reactions included
    pub async fn find_by_public_id(&self, public_id: &str) -> DatabaseResult<Option<ChatMessage>> {
        let row = sqlx::query(&format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE public_id = ?"))
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut message = map_message(&row)?;
        message.reactions = self.reactions.for_message(message.id).await?;
        Ok(Some(message))
    }

    /// All messages of an event, oldest first; ties keep insertion order
    pub async fn list_by_event(&self, event_id: &str) -> DatabaseResult<Vec<ChatMessage>> {
        let rows = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE event_id = ? ORDER BY created_at ASC, id ASC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        self.with_reactions(event_id, rows).await
    }

    /// Messages that sort after `cursor` within the same event
    pub async fn list_after(&self, event_id: &str, cursor: &ChatMessage) -> DatabaseResult<Vec<ChatMessage>> {
        let rows = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages
             WHERE event_id = ? AND (created_at > ? OR (created_at = ? AND id > ?))
             ORDER BY created_at ASC, id ASC"
        ))
        .bind(event_id)
        .bind(&cursor.created_at)
        .bind(&cursor.created_at)
        .bind(cursor.id)
        .fetch_all(&self.pool)
        .await?;

        self.with_reactions(event_id, rows).await
    }

    /// Count messages for an event
    pub async fn count_by_event(&self, event_id: &str) -> DatabaseResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE event_id = ?")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn with_reactions(&self, event_id: &str, rows: Vec<SqliteRow>) -> DatabaseResult<Vec<ChatMessage>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut reactions = self.reactions.for_event(event_id).await?;
        rows.iter()
            .map(|row| {
                let mut message = map_message(row)?;
                message.reactions = reactions.remove(&message.id).unwrap_or_default();
                Ok(message)
            })
            .collect()
    }
}

fn map_message(row: &SqliteRow) -> DatabaseResult<ChatMessage> {
    Ok(ChatMessage {
        id: row.try_get("id")?,
        public_id: row.try_get("public_id")?,
        event_id: row.try_get("event_id")?,
        sender_id: row.try_get("sender_id")?,
        sender_name: row.try_get("sender_name")?,
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
        reactions: ReactionMap::new(),
    })
}
