//! The notification channel abstraction and the "event created" payload.

use async_trait::async_trait;
use rally_database::{DatabaseError, Event, User};
use serde::Serialize;
use thiserror::Error;

/// Payload fanned out when an event is created.
#[derive(Debug, Clone, Serialize)]
pub struct EventCreatedNotification {
    pub event: Event,
    pub interested_users: Vec<User>,
}

/// Delivery failure reported by a channel
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("delivery request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("delivery rejected with status {status}")]
    Rejected { status: u16 },
    #[error("failed to store notification: {0}")]
    Database(#[from] DatabaseError),
    #[error("{failed} of {attempted} deliveries failed")]
    PartialDelivery { failed: usize, attempted: usize },
}

/// A destination that can deliver event announcements.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Name reported in dispatch results
    fn name(&self) -> &str;

    /// Deliver `notification` to every interested user.
    async fn receive(&self, notification: &EventCreatedNotification) -> Result<(), ChannelError>;
}

/// Subject line shared by every channel.
pub fn announcement_subject(event: &Event) -> String {
    format!("New event: {}", event.title)
}

/// Plain-text announcement body.
pub fn announcement_body(event: &Event) -> String {
    let mut body = format!(
        "{}\nDate: {}\nTime: {}\nLocation: {}\n",
        event.title,
        event.date.format("%Y-%m-%d"),
        event.time_window(),
        event.location,
    );
    if let Some(speaker) = &event.speaker {
        body.push_str(&format!("Speaker: {speaker}\n"));
    }
    if !event.description.is_empty() {
        body.push('\n');
        body.push_str(&event.description);
        body.push('\n');
    }
    body
}
