//! Chat summary REST endpoint

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ErrorResponse;
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryResponse {
    pub event_id: String,
    pub summary: String,
}

/// Create summary routes
pub fn create_summary_routes() -> Router<Arc<GatewayState>> {
    Router::new().route("/events/:event_id/summary", get(get_summary))
}

/// Summaries never fail; problems produce a fixed fallback text.
#[utoipa::path(
    get,
    path = "/api/events/{event_id}/summary",
    tag = "Summaries",
    params(("event_id" = String, Path, description = "Event public ID")),
    responses(
        (status = 200, description = "Chat summary or fallback text", body = SummaryResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn get_summary(
    Path(event_id): Path<String>,
    State(state): State<Arc<GatewayState>>,
) -> Json<SummaryResponse> {
    let summary = state.summary_service.summarize(&event_id).await;
    Json(SummaryResponse { event_id, summary })
}
