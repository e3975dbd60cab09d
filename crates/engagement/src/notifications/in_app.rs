//! In-app inbox delivery.

use super::channel::{
    announcement_body, announcement_subject, ChannelError, EventCreatedNotification,
    NotificationChannel,
};
use async_trait::async_trait;
use rally_database::{CreateNotificationRequest, NotificationRepository};
use sqlx::SqlitePool;
use tracing::{debug, warn};

/// Stores one inbox notification per interested user.
pub struct InAppChannel {
    notifications: NotificationRepository,
}

impl InAppChannel {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            notifications: NotificationRepository::new(pool),
        }
    }
}

#[async_trait]
impl NotificationChannel for InAppChannel {
    fn name(&self) -> &str {
        "in_app"
    }

    async fn receive(&self, notification: &EventCreatedNotification) -> Result<(), ChannelError> {
        let event = &notification.event;
        let title = announcement_subject(event);
        let body = announcement_body(event);

        let mut failed = 0;

        for user in &notification.interested_users {
            let stored = self
                .notifications
                .create(&CreateNotificationRequest {
                    user_id: user.public_id.clone(),
                    event_id: Some(event.public_id.clone()),
                    title: title.clone(),
                    body: body.clone(),
                })
                .await;
            if let Err(err) = stored {
                warn!(user_id = %user.public_id, error = %err, "in-app notification not stored");
                failed += 1;
            }
        }

        if failed > 0 {
            return Err(ChannelError::PartialDelivery {
                failed,
                attempted: notification.interested_users.len(),
            });
        }

        debug!(
            event_id = %event.public_id,
            recipients = notification.interested_users.len(),
            "stored in-app notifications"
        );
        Ok(())
    }
}
