//! In-app notification entity definitions

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub public_id: String,
    pub user_id: String,
    pub event_id: Option<String>,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotificationRequest {
    pub user_id: String,
    pub event_id: Option<String>,
    pub title: String,
    pub body: String,
}
