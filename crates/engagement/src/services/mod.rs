//! Business logic services for the engagement engine.
//!
//! Services coordinate between repositories, the notification dispatcher
//! and the summary provider, and enforce the business rules.

pub mod event_service;
pub mod interest_matcher;
pub mod message_service;
pub mod notification_service;
pub mod reaction_service;
pub mod summary_service;

// Re-export all services
pub use event_service::{AnnouncementReport, CreatedEvent, EventService};
pub use interest_matcher::match_interested_users;
pub use message_service::{MessageService, MAX_MESSAGE_LENGTH};
pub use notification_service::NotificationService;
pub use reaction_service::{ReactionService, MAX_EMOJI_BYTES};
pub use summary_service::{SummaryService, NO_MESSAGES_SUMMARY, SUMMARY_FALLBACK};
