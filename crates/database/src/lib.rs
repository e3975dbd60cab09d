//! Rally Database Crate
//!
//! This crate provides database functionality for the Rally engagement
//! backend, including connection management, migrations, and repository
//! implementations for users, events, messages, reactions and notifications.

use chrono::{SecondsFormat, Utc};
use rally_config::DatabaseConfig;
use sqlx::SqlitePool;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::{prepare_database, DatabaseConnection};
pub use migrations::{run_migrations, MIGRATOR};

// Re-export repositories
pub use repos::{
    EventRepository, MessageRepository, NotificationRepository, ReactionRepository, UserRepository,
};

// Re-export entities
pub use entities::{
    ChatMessage, CreateEventRequest, CreateMessageRequest, CreateNotificationRequest,
    CreateUserRequest, Event, Notification, ReactionMap, User,
};

// Re-export types
pub use types::{DatabaseError, DatabaseResult};

/// Current time as a fixed-width RFC 3339 string.
///
/// Stored timestamps are compared as text, so every value carries the same
/// precision and the `Z` suffix.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Initialize the database with migrations
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;

    Ok(pool)
}

/// Helpers for tests in this and downstream crates.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use tempfile::TempDir;

    /// Migrated SQLite database in a fresh temporary directory.
    ///
    /// Keep the returned `TempDir` alive for as long as the pool is used.
    pub async fn create_test_pool() -> (SqlitePool, TempDir) {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let db_path = temp_dir.path().join("rally-test.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            max_connections: 5,
        };

        let pool = initialize_database(&config)
            .await
            .expect("failed to initialise test database");
        (pool, temp_dir)
    }

    /// An evening talk on 2025-03-15, 18:00 - 20:00.
    pub fn sample_event_request(tags: Option<&[&str]>) -> CreateEventRequest {
        CreateEventRequest {
            title: "Rust Meetup".to_string(),
            description: "Talks and pizza".to_string(),
            speaker: Some("Ferris".to_string()),
            date: NaiveDate::from_ymd_opt(2025, 3, 15).expect("valid date"),
            start_time: NaiveTime::from_hms_opt(18, 0, 0).expect("valid time"),
            end_time: NaiveTime::from_hms_opt(20, 0, 0).expect("valid time"),
            location: "Community Hall".to_string(),
            tags: tags.map(|tags| tags.iter().map(|tag| tag.to_string()).collect()),
        }
    }
}
