//! Notification repository for database operations.

use crate::entities::{CreateNotificationRequest, Notification};
use crate::timestamp_now;
use crate::types::DatabaseResult;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

const NOTIFICATION_COLUMNS: &str = "id, public_id, user_id, event_id, title, body, is_read, created_at";

/// Repository for notification database operations
#[derive(Clone)]
pub struct NotificationRepository {
    pool: SqlitePool,
}

impl NotificationRepository {
    /// Create a new notification repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new notification
    pub async fn create(&self, request: &CreateNotificationRequest) -> DatabaseResult<Notification> {
        let public_id = cuid2::cuid();
        let now = timestamp_now();

        let result = sqlx::query(
            "INSERT INTO notifications (public_id, user_id, event_id, title, body, is_read, created_at)
             VALUES (?, ?, ?, ?, ?, false, ?)",
        )
        .bind(&public_id)
        .bind(&request.user_id)
        .bind(&request.event_id)
        .bind(&request.title)
        .bind(&request.body)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(notification_id = id, user_id = %request.user_id, "stored notification");

        Ok(Notification {
            id,
            public_id,
            user_id: request.user_id.clone(),
            event_id: request.event_id.clone(),
            title: request.title.clone(),
            body: request.body.clone(),
            is_read: false,
            created_at: now,
        })
    }

    /// Notifications for a user, newest first
    pub async fn find_by_user_id(&self, user_id: &str, unread_only: bool) -> DatabaseResult<Vec<Notification>> {
        let query = if unread_only {
            format!(
                "SELECT {NOTIFICATION_COLUMNS} FROM notifications
                 WHERE user_id = ? AND is_read = false ORDER BY created_at DESC, id DESC"
            )
        } else {
            format!(
                "SELECT {NOTIFICATION_COLUMNS} FROM notifications
                 WHERE user_id = ? ORDER BY created_at DESC, id DESC"
            )
        };

        let rows = sqlx::query(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_notification).collect()
    }

    /// Mark a notification as read. Returns `false` if the user owns no such notification.
    pub async fn mark_as_read(&self, public_id: &str, user_id: &str) -> DatabaseResult<bool> {
        let result = sqlx::query("UPDATE notifications SET is_read = true WHERE public_id = ? AND user_id = ?")
            .bind(public_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get unread notification count for a user
    pub async fn get_unread_count(&self, user_id: &str) -> DatabaseResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = ? AND is_read = false")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn map_notification(row: &SqliteRow) -> DatabaseResult<Notification> {
    Ok(Notification {
        id: row.try_get("id")?,
        public_id: row.try_get("public_id")?,
        user_id: row.try_get("user_id")?,
        event_id: row.try_get("event_id")?,
        title: row.try_get("title")?,
        body: row.try_get("body")?,
        is_read: row.try_get("is_read")?,
        created_at: row.try_get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_pool;

    fn request(user_id: &str, title: &str) -> CreateNotificationRequest {
        CreateNotificationRequest {
            user_id: user_id.to_string(),
            event_id: None,
            title: title.to_string(),
            body: "body".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_notifications() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = NotificationRepository::new(pool);

        repo.create(&request("alice", "first")).await.unwrap();
        repo.create(&request("alice", "second")).await.unwrap();
        repo.create(&request("bob", "other")).await.unwrap();

        let inbox = repo.find_by_user_id("alice", false).await.unwrap();
        let titles: Vec<&str> = inbox.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["second", "first"]);
        assert_eq!(repo.get_unread_count("alice").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_mark_as_read_is_scoped_to_owner() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = NotificationRepository::new(pool);

        let notification = repo.create(&request("alice", "hello")).await.unwrap();

        assert!(!repo.mark_as_read(&notification.public_id, "bob").await.unwrap());
        assert!(repo.mark_as_read(&notification.public_id, "alice").await.unwrap());

        assert!(repo.find_by_user_id("alice", true).await.unwrap().is_empty());
        let all = repo.find_by_user_id("alice", false).await.unwrap();
        assert!(all[0].is_read);
    }
}
