//! Message REST endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use rally_database::{ChatMessage, ReactionMap};
use rally_engagement::Actor;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::error::{ErrorResponse, GatewayResult};
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub id: String,
    pub event_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub content: String,
    pub created_at: String,
    /// Emoji to the names of the users who reacted, in reaction order
    #[schema(value_type = Object)]
    pub reactions: ReactionMap,
}

impl From<ChatMessage> for MessageResponse {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.public_id,
            event_id: message.event_id,
            sender_id: message.sender_id,
            sender_name: message.sender_name,
            content: message.content,
            created_at: message.created_at,
            reactions: message.reactions,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMessageBody {
    pub content: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListMessagesQuery {
    /// Only return messages posted after this message ID
    pub after: Option<String>,
}

/// Create message routes
pub fn create_message_routes() -> Router<Arc<GatewayState>> {
    Router::new().route(
        "/events/:event_id/messages",
        get(list_messages).post(create_message),
    )
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/messages",
    tag = "Messages",
    params(
        ("event_id" = String, Path, description = "Event public ID"),
        ListMessagesQuery
    ),
    responses(
        (status = 200, description = "Messages in chronological order", body = Vec<MessageResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Event or cursor message not found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn list_messages(
    Path(event_id): Path<String>,
    Query(params): Query<ListMessagesQuery>,
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<Vec<MessageResponse>>> {
    let messages = match params.after.as_deref() {
        Some(cursor) => {
            state
                .message_service
                .list_messages_after(&event_id, cursor)
                .await?
        }
        None => state.message_service.list_messages(&event_id).await?,
    };

    Ok(Json(messages.into_iter().map(MessageResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/messages",
    tag = "Messages",
    params(("event_id" = String, Path, description = "Event public ID")),
    request_body = CreateMessageBody,
    responses(
        (status = 201, description = "Message posted", body = MessageResponse),
        (status = 400, description = "Empty or oversized message", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn create_message(
    Path(event_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
    Extension(actor): Extension<Actor>,
    Json(body): Json<CreateMessageBody>,
) -> GatewayResult<(StatusCode, Json<MessageResponse>)> {
    let message = state
        .message_service
        .post_message(&event_id, &actor, &body.content)
        .await?;

    Ok((StatusCode::CREATED, Json(message.into())))
}
