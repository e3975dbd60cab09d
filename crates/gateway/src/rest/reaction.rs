//! Reaction REST endpoints

use axum::{
    extract::{Path, State},
    routing::post,
    Extension, Json, Router,
};
use rally_engagement::Actor;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::message::MessageResponse;
use crate::error::{ErrorResponse, GatewayResult};
use crate::state::GatewayState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddReactionBody {
    pub emoji: String,
}

/// Create reaction routes
pub fn create_reaction_routes() -> Router<Arc<GatewayState>> {
    Router::new().route("/messages/:message_id/reactions", post(add_reaction))
}

#[utoipa::path(
    post,
    path = "/api/messages/{message_id}/reactions",
    tag = "Reactions",
    params(("message_id" = String, Path, description = "Message public ID")),
    request_body = AddReactionBody,
    responses(
        (status = 200, description = "Message with updated reactions", body = MessageResponse),
        (status = 400, description = "Invalid emoji", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Message not found", body = ErrorResponse),
        (status = 409, description = "Concurrent write, retry", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn add_reaction(
    Path(message_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
    Extension(actor): Extension<Actor>,
    Json(body): Json<AddReactionBody>,
) -> GatewayResult<Json<MessageResponse>> {
    let message = state
        .reaction_service
        .add_reaction(&message_id, &body.emoji, &actor)
        .await?;

    Ok(Json(message.into()))
}
