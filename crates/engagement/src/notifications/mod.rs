//! Event announcement channels and the dispatcher that fans out to them.

pub mod channel;
pub mod dispatcher;
pub mod email;
pub mod in_app;

pub use channel::{ChannelError, EventCreatedNotification, NotificationChannel};
pub use dispatcher::{ChannelOutcome, DeliveryStatus, DispatchReport, NotificationDispatcher};
pub use email::EmailChannel;
pub use in_app::InAppChannel;
