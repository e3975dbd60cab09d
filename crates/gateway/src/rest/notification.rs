//! In-app notification REST endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use rally_database::Notification;
use rally_engagement::Actor;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::error::{ErrorResponse, GatewayResult};
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationResponse {
    pub id: String,
    pub event_id: Option<String>,
    pub title: String,
    pub body: String,
    pub read: bool,
    pub created_at: String,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.public_id,
            event_id: notification.event_id,
            title: notification.title,
            body: notification.body,
            read: notification.is_read,
            created_at: notification.created_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListNotificationsQuery {
    #[serde(default)]
    pub unread_only: bool,
}

/// Create notification routes
pub fn create_notification_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/:notification_id/read", post(mark_notification_read))
}

#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "Notifications",
    params(ListNotificationsQuery),
    responses(
        (status = 200, description = "Caller's notifications, newest first", body = Vec<NotificationResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn list_notifications(
    Query(params): Query<ListNotificationsQuery>,
    State(state): State<Arc<GatewayState>>,
    Extension(actor): Extension<Actor>,
) -> GatewayResult<Json<Vec<NotificationResponse>>> {
    let notifications = state
        .notification_service
        .list_notifications(&actor.user_id, params.unread_only)
        .await?;

    Ok(Json(
        notifications.into_iter().map(NotificationResponse::from).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/notifications/{notification_id}/read",
    tag = "Notifications",
    params(("notification_id" = String, Path, description = "Notification public ID")),
    responses(
        (status = 204, description = "Notification marked as read"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn mark_notification_read(
    Path(notification_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
    Extension(actor): Extension<Actor>,
) -> GatewayResult<StatusCode> {
    state
        .notification_service
        .mark_read(&actor.user_id, &notification_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
