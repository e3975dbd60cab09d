//! Notification service: a user's in-app inbox.

use crate::types::{EngagementError, EngagementResult};
use rally_database::{Notification, NotificationRepository};
use sqlx::SqlitePool;

/// Service for reading and acknowledging inbox notifications
#[derive(Clone)]
pub struct NotificationService {
    notifications: NotificationRepository,
}

impl NotificationService {
    /// Create a new notification service instance
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            notifications: NotificationRepository::new(pool),
        }
    }

    /// Notifications for `user_id`, newest first
    pub async fn list_notifications(
        &self,
        user_id: &str,
        unread_only: bool,
    ) -> EngagementResult<Vec<Notification>> {
        Ok(self.notifications.find_by_user_id(user_id, unread_only).await?)
    }

    pub async fn unread_count(&self, user_id: &str) -> EngagementResult<i64> {
        Ok(self.notifications.get_unread_count(user_id).await?)
    }

    /// Mark one of the user's notifications as read
    pub async fn mark_read(&self, user_id: &str, notification_id: &str) -> EngagementResult<()> {
        if self.notifications.mark_as_read(notification_id, user_id).await? {
            Ok(())
        } else {
            Err(EngagementError::notification_not_found(notification_id))
        }
    }
}
