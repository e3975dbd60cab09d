//! Shared application state for the gateway

use rally_config::AuthConfig;
use rally_engagement::{
    EventService, MessageService, NotificationDispatcher, NotificationService, ReactionService,
    SummaryProvider, SummaryService,
};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth::JwtManager;

/// Shared application state containing all services
#[derive(Clone)]
pub struct GatewayState {
    /// Database connection pool
    pub pool: SqlitePool,
    /// Bearer token validation
    pub jwt: Arc<JwtManager>,
    /// Channels notified when events are created
    pub dispatcher: Arc<NotificationDispatcher>,
    pub event_service: EventService,
    pub message_service: MessageService,
    pub reaction_service: ReactionService,
    pub summary_service: SummaryService,
    pub notification_service: NotificationService,
}

impl GatewayState {
    /// Create a new gateway state with all services initialized
    pub fn new(
        pool: SqlitePool,
        auth: &AuthConfig,
        dispatcher: Arc<NotificationDispatcher>,
        summary_provider: Arc<dyn SummaryProvider>,
    ) -> Self {
        Self {
            jwt: Arc::new(JwtManager::from_config(auth)),
            event_service: EventService::new(pool.clone(), Arc::clone(&dispatcher)),
            message_service: MessageService::new(pool.clone()),
            reaction_service: ReactionService::new(pool.clone()),
            summary_service: SummaryService::new(pool.clone(), summary_provider),
            notification_service: NotificationService::new(pool.clone()),
            dispatcher,
            pool,
        }
    }
}
