//! # Rally Engagement Crate
//!
//! Core business logic for event chatrooms and event announcements.
//!
//! ## Architecture
//!
//! - **Services**: message store, reactions, event announcements, inbox and
//!   chat summaries
//! - **Notifications**: the channel trait, the dispatcher and the built-in
//!   email and in-app channels
//! - **Providers**: text-generation backends used for summaries
//! - **Types**: the acting user and the error type
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rally_engagement::{Actor, MessageService};
//!
//! let service = MessageService::new(pool);
//! let message = service.post_message(&event_id, &Actor::new(user_id, "Bob"), "Hello").await?;
//! ```

pub mod notifications;
pub mod providers;
pub mod services;
pub mod types;

pub use notifications::{
    ChannelError, ChannelOutcome, DeliveryStatus, DispatchReport, EmailChannel,
    EventCreatedNotification, InAppChannel, NotificationChannel, NotificationDispatcher,
};
pub use providers::{OpenAiSummaryProvider, SummaryProvider, UpstreamError};
pub use services::{
    match_interested_users, AnnouncementReport, CreatedEvent, EventService, MessageService,
    NotificationService, ReactionService, SummaryService, NO_MESSAGES_SUMMARY, SUMMARY_FALLBACK,
};
pub use types::{Actor, EngagementError, EngagementResult};
