//! Domain entities for the database layer
//!
//! Plain data types shared by the repositories and the engagement services.

pub mod event;
pub mod message;
pub mod notification;
pub mod user;

// Re-export all entity types
pub use event::{CreateEventRequest, Event};
pub use message::{ChatMessage, CreateMessageRequest, ReactionMap};
pub use notification::{CreateNotificationRequest, Notification};
pub use user::{CreateUserRequest, User};
