//! Event REST endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{NaiveDate, NaiveTime};
use rally_database::{CreateEventRequest, Event};
use rally_engagement::{Actor, AnnouncementReport};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, GatewayResult};
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct EventResponse {
    pub id: String,
    pub organizer_id: String,
    pub title: String,
    pub description: String,
    pub speaker: Option<String>,
    #[schema(value_type = String, example = "2025-03-15")]
    pub date: NaiveDate,
    #[schema(value_type = String, example = "18:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "20:00:00")]
    pub end_time: NaiveTime,
    pub location: String,
    pub tags: Option<Vec<String>>,
    pub created_at: String,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.public_id,
            organizer_id: event.organizer_id,
            title: event.title,
            description: event.description,
            speaker: event.speaker,
            date: event.date,
            start_time: event.start_time,
            end_time: event.end_time,
            location: event.location,
            tags: event.tags,
            created_at: event.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEventBody {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub speaker: Option<String>,
    #[schema(value_type = String, example = "2025-03-15")]
    pub date: NaiveDate,
    #[schema(value_type = String, example = "18:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "20:00:00")]
    pub end_time: NaiveTime,
    #[serde(default)]
    pub location: String,
    pub tags: Option<Vec<String>>,
}

impl From<CreateEventBody> for CreateEventRequest {
    fn from(body: CreateEventBody) -> Self {
        Self {
            title: body.title,
            description: body.description,
            speaker: body.speaker,
            date: body.date,
            start_time: body.start_time,
            end_time: body.end_time,
            location: body.location,
            tags: body.tags,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedEventResponse {
    pub event: EventResponse,
    /// Outcome of notifying interested users
    #[schema(value_type = Object)]
    pub announcement: AnnouncementReport,
}

/// Create event routes
pub fn create_event_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/events", post(create_event))
        .route("/events/:event_id", get(get_event))
}

#[utoipa::path(
    post,
    path = "/api/events",
    tag = "Events",
    request_body = CreateEventBody,
    responses(
        (status = 201, description = "Event created and announced", body = CreatedEventResponse),
        (status = 400, description = "Invalid event", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn create_event(
    State(state): State<Arc<GatewayState>>,
    Extension(actor): Extension<Actor>,
    Json(body): Json<CreateEventBody>,
) -> GatewayResult<(StatusCode, Json<CreatedEventResponse>)> {
    let created = state
        .event_service
        .create_event(&actor, body.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedEventResponse {
            event: created.event.into(),
            announcement: created.announcement,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}",
    tag = "Events",
    params(("event_id" = String, Path, description = "Event public ID")),
    responses(
        (status = 200, description = "Event details", body = EventResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn get_event(
    Path(event_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<EventResponse>> {
    let event = state.event_service.get_event(&event_id).await?;
    Ok(Json(event.into()))
}
