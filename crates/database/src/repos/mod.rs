//! Database repository implementations

pub mod event_repository;
pub mod message_repository;
pub mod notification_repository;
pub mod reaction_repository;
pub mod user_repository;

// Re-export all repositories for convenience
pub use event_repository::*;
pub use message_repository::*;
pub use notification_repository::*;
pub use reaction_repository::*;
pub use user_repository::*;
