//! Event entity definitions

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// An organized event; each event owns one chatroom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub public_id: String,
    pub organizer_id: String,
    pub title: String,
    pub description: String,
    pub speaker: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: String,
    /// Interest tags; `None` when the organizer supplied none
    pub tags: Option<Vec<String>>,
    pub created_at: String,
}

/// Request for creating a new event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub speaker: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub location: String,
    pub tags: Option<Vec<String>>,
}

impl Event {
    /// Human readable time window, e.g. `18:00 - 20:30`.
    pub fn time_window(&self) -> String {
        format!(
            "{} - {}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}

impl CreateEventRequest {
    /// Validate the create request
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Event title cannot be empty".to_string());
        }

        if self.title.chars().count() > 200 {
            return Err("Event title too long (max 200 characters)".to_string());
        }

        if self.end_time <= self.start_time {
            return Err("Event must end after it starts".to_string());
        }

        if let Some(tags) = &self.tags {
            if tags.iter().any(|tag| tag.trim().is_empty()) {
                return Err("Event tags cannot be empty".to_string());
            }
        }

        Ok(())
    }
}
