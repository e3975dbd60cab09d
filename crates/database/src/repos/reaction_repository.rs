//! Repository for per-message emoji reactions.
//!
//! Each reaction is its own row, unique per (message, emoji, user). Adding a
//! reaction is therefore a single conditional insert and concurrent reactions
//! to the same message can never overwrite each other.

use crate::entities::ReactionMap;
use crate::timestamp_now;
use crate::types::DatabaseResult;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use tracing::debug;

/// Repository for reaction database operations
#[derive(Clone)]
pub struct ReactionRepository {
    pool: SqlitePool,
}

impl ReactionRepository {
    /// Create a new reaction repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record that `user_id` reacted to a message with `emoji`.
    ///
    /// Returns `false` when that user had already reacted with the same
    /// emoji; the existing entry is left untouched.
    pub async fn add(
        &self,
        message_id: i64,
        emoji: &str,
        user_id: &str,
        reactor_name: &str,
    ) -> DatabaseResult<bool> {
        let result = sqlx::query(
            "INSERT INTO reactions (message_id, emoji, user_id, reactor_name, created_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (message_id, emoji, user_id) DO NOTHING",
        )
        .bind(message_id)
        .bind(emoji)
        .bind(user_id)
        .bind(reactor_name)
        .bind(timestamp_now())
        .execute(&self.pool)
        .await?;

        let inserted = result.rows_affected() > 0;
        debug!(message_id, emoji, user_id, inserted, "recorded reaction");
        Ok(inserted)
    }

    /// Reaction map for a single message
    pub async fn for_message(&self, message_id: i64) -> DatabaseResult<ReactionMap> {
        let rows = sqlx::query(
            "SELECT emoji, reactor_name FROM reactions WHERE message_id = ? ORDER BY id ASC",
        )
        .bind(message_id)
        .fetch_all(&self.pool)
        .await?;

        let mut reactions = ReactionMap::new();
        for row in rows {
            let emoji: String = row.try_get("emoji")?;
            let name: String = row.try_get("reactor_name")?;
            reactions.entry(emoji).or_default().push(name);
        }

        Ok(reactions)
    }

    /// Reaction maps for every message of an event, keyed by message row id
    pub async fn for_event(&self, event_id: &str) -> DatabaseResult<HashMap<i64, ReactionMap>> {
        let rows = sqlx::query(
            "SELECT r.message_id, r.emoji, r.reactor_name
             FROM reactions r
             JOIN messages m ON m.id = r.message_id
             WHERE m.event_id = ?
             ORDER BY r.id ASC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        let mut by_message: HashMap<i64, ReactionMap> = HashMap::new();
        for row in rows {
            let message_id: i64 = row.try_get("message_id")?;
            let emoji: String = row.try_get("emoji")?;
            let name: String = row.try_get("reactor_name")?;
            by_message
                .entry(message_id)
                .or_default()
                .entry(emoji)
                .or_default()
                .push(name);
        }

        Ok(by_message)
    }
}
