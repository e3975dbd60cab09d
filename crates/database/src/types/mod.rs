//! Shared types and result types for the database layer

pub mod errors;

// Re-export common types
pub use errors::DatabaseError;

// Common result types
pub type DatabaseResult<T> = Result<T, DatabaseError>;

// Re-export request types from entities
pub use crate::entities::{
    CreateEventRequest, CreateMessageRequest, CreateNotificationRequest, CreateUserRequest,
};
