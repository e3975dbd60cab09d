//! Error types for the database layer

use thiserror::Error;

/// SQLite result codes that signal a competing writer rather than a broken query.
const SQLITE_BUSY_CODES: &[&str] = &["5", "6", "261", "262", "517"];

/// General database error
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database query error: {0}")]
    QueryError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Concurrent update conflict: {0}")]
    Conflict(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DatabaseError {
    /// Whether retrying the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DatabaseError::Conflict(_))
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            if let Some(code) = db_error.code() {
                let code: &str = &code;
                if SQLITE_BUSY_CODES.contains(&code) {
                    return DatabaseError::Conflict(db_error.message().to_string());
                }
            }
            if db_error.is_unique_violation() {
                return DatabaseError::Duplicate(db_error.message().to_string());
            }
        }

        DatabaseError::QueryError(error.to_string())
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(error: serde_json::Error) -> Self {
        DatabaseError::SerializationError(error.to_string())
    }
}
