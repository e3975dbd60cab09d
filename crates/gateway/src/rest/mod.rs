//! REST API endpoints for the gateway

pub mod event;
pub mod health;
pub mod message;
pub mod notification;
pub mod reaction;
pub mod summary;

use axum::{middleware as axum_middleware, routing::get, Router};
use std::sync::Arc;

use crate::middleware::auth_middleware;
use crate::state::GatewayState;

/// Create all REST API routes. Everything under `/api` requires a bearer token.
pub fn create_rest_routes(state: Arc<GatewayState>) -> Router<Arc<GatewayState>> {
    let api = Router::new()
        .merge(event::create_event_routes())
        .merge(message::create_message_routes())
        .merge(reaction::create_reaction_routes())
        .merge(summary::create_summary_routes())
        .merge(notification::create_notification_routes())
        .route_layer(axum_middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api)
}
