//! Event service: event creation and the interest-based announcement.

use crate::notifications::{DispatchReport, EventCreatedNotification, NotificationDispatcher};
use crate::services::interest_matcher::match_interested_users;
use crate::types::{Actor, EngagementError, EngagementResult};
use rally_database::{CreateEventRequest, Event, EventRepository, UserRepository};
use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{error, info, warn};

/// What happened when a new event was announced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnnouncementReport {
    Dispatched {
        interested_users: usize,
        dispatch: DispatchReport,
    },
    /// Dispatched with an empty recipient list.
    NoInterestedUsers { dispatch: DispatchReport },
    Skipped {
        reason: String,
    },
}

/// A persisted event together with its announcement outcome
#[derive(Debug, Clone, Serialize)]
pub struct CreatedEvent {
    pub event: Event,
    pub announcement: AnnouncementReport,
}

/// Service for creating and reading events
#[derive(Clone)]
pub struct EventService {
    events: EventRepository,
    users: UserRepository,
    dispatcher: Arc<NotificationDispatcher>,
}

impl EventService {
    /// Create a new event service instance
    pub fn new(pool: SqlitePool, dispatcher: Arc<NotificationDispatcher>) -> Self {
        Self {
            events: EventRepository::new(pool.clone()),
            users: UserRepository::new(pool),
            dispatcher,
        }
    }

    /// Persist a new event and announce it to interested users.
    ///
    /// Once the event is stored the call succeeds; announcement problems are
    /// logged and described in the returned report.
    pub async fn create_event(
        &self,
        organizer: &Actor,
        request: CreateEventRequest,
    ) -> EngagementResult<CreatedEvent> {
        request.validate().map_err(EngagementError::validation)?;

        let event = self.events.create(&organizer.user_id, &request).await?;
        info!(event_id = %event.public_id, organizer = %organizer.user_id, "event created");

        let announcement = self.announce(&event).await;
        Ok(CreatedEvent { event, announcement })
    }

    /// Get an event by its public ID
    pub async fn get_event(&self, event_id: &str) -> EngagementResult<Event> {
        self.events
            .find_by_public_id(event_id)
            .await?
            .ok_or_else(|| EngagementError::event_not_found(event_id))
    }

    async fn announce(&self, event: &Event) -> AnnouncementReport {
        let users = match self.users.list_all().await {
            Ok(users) => users,
            Err(err) => {
                error!(event_id = %event.public_id, error = %err, "failed to load user directory");
                return AnnouncementReport::Skipped {
                    reason: "user directory unavailable".to_string(),
                };
            }
        };

        let interested_users = match match_interested_users(event, &users) {
            Ok(users) => users,
            Err(err) => {
                warn!(event_id = %event.public_id, error = %err, "event not announced");
                return AnnouncementReport::Skipped {
                    reason: err.to_string(),
                };
            }
        };

        let count = interested_users.len();
        let dispatch = self
            .dispatcher
            .dispatch(EventCreatedNotification {
                event: event.clone(),
                interested_users,
            })
            .await;

        if count == 0 {
            info!(event_id = %event.public_id, "no interested users for event");
            return AnnouncementReport::NoInterestedUsers { dispatch };
        }

        AnnouncementReport::Dispatched {
            interested_users: count,
            dispatch,
        }
    }
}
