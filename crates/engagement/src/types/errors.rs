//! Error types for the engagement engine.

use rally_database::DatabaseError;
use thiserror::Error;

/// Result type alias for engagement operations
pub type EngagementResult<T> = Result<T, EngagementError>;

/// Main error type for the engagement engine
#[derive(Debug, Error)]
pub enum EngagementError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Event not found: {id}")]
    EventNotFound { id: String },

    #[error("Message not found: {id}")]
    MessageNotFound { id: String },

    #[error("Notification not found: {id}")]
    NotificationNotFound { id: String },

    #[error("Conflicting concurrent update: {message}")]
    Conflict { message: String },

    #[error("Upstream service error: {message}")]
    Upstream { message: String },

    #[error("Database error: {0}")]
    Database(DatabaseError),
}

impl EngagementError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    /// Create a not found error for events
    pub fn event_not_found(id: impl Into<String>) -> Self {
        Self::EventNotFound { id: id.into() }
    }

    /// Create a not found error for messages
    pub fn message_not_found(id: impl Into<String>) -> Self {
        Self::MessageNotFound { id: id.into() }
    }

    /// Create a not found error for notifications
    pub fn notification_not_found(id: impl Into<String>) -> Self {
        Self::NotificationNotFound { id: id.into() }
    }

    /// Create an upstream error
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream { message: message.into() }
    }

    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl From<DatabaseError> for EngagementError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Conflict(message) => Self::Conflict { message },
            other => Self::Database(other),
        }
    }
}
