//! Repository for event data access operations.

use crate::entities::{CreateEventRequest, Event};
use crate::timestamp_now;
use crate::types::DatabaseResult;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;

const EVENT_COLUMNS: &str = "id, public_id, organizer_id, title, description, speaker, event_date, start_time, end_time, location, tags, created_at";

/// Repository for event database operations
#[derive(Clone)]
pub struct EventRepository {
    pool: SqlitePool,
}

impl EventRepository {
    /// Create a new event repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a new event organized by `organizer_id`
    pub async fn create(&self, organizer_id: &str, request: &CreateEventRequest) -> DatabaseResult<Event> {
        let public_id = cuid2::cuid();
        let now = timestamp_now();
        let tags = request
            .tags
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let result = sqlx::query(
            "INSERT INTO events (public_id, organizer_id, title, description, speaker, event_date, start_time, end_time, location, tags, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(organizer_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(&request.speaker)
        .bind(request.date)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(&request.location)
        .bind(&tags)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(event_id = id, public_id = %public_id, organizer_id, "created event");

        Ok(Event {
            id,
            public_id,
            organizer_id: organizer_id.to_string(),
            title: request.title.clone(),
            description: request.description.clone(),
            speaker: request.speaker.clone(),
            date: request.date,
            start_time: request.start_time,
            end_time: request.end_time,
            location: request.location.clone(),
            tags: request.tags.clone(),
            created_at: now,
        })
    }

    /// Find an event by its public ID
    pub async fn find_by_public_id(&self, public_id: &str) -> DatabaseResult<Option<Event>> {
        let row = sqlx::query(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE public_id = ?"))
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_event).transpose()
    }

    /// Whether an event with this public ID exists
    pub async fn exists(&self, public_id: &str) -> DatabaseResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM events WHERE public_id = ?")
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    /// Events in chronological order of their date and start time
    pub async fn list_upcoming(&self, limit: i64) -> DatabaseResult<Vec<Event>> {
        let rows = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY event_date ASC, start_time ASC, id ASC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_event).collect()
    }
}

fn map_event(row: &SqliteRow) -> DatabaseResult<Event> {
    let tags: Option<String> = row.try_get("tags")?;

    Ok(Event {
        id: row.try_get("id")?,
        public_id: row.try_get("public_id")?,
        organizer_id: row.try_get("organizer_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        speaker: row.try_get("speaker")?,
        date: row.try_get("event_date")?,
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
        location: row.try_get("location")?,
        tags: tags.as_deref().map(serde_json::from_str).transpose()?,
        created_at: row.try_get("created_at")?,
    })
}
