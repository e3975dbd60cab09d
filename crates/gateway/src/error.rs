//! Error types for the gateway layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rally_engagement::EngagementError;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;

/// Gateway error types
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Upstream service error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// JSON body of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Conflict(_) => StatusCode::CONFLICT,
            GatewayError::Upstream(_) => StatusCode::BAD_GATEWAY,
            GatewayError::InternalError(_) | GatewayError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to clients. Server-side details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            GatewayError::Upstream(_) => "Upstream service unavailable".to_string(),
            GatewayError::InternalError(_) | GatewayError::DatabaseError(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let error_response = json!({
            "error": status.as_str(),
            "message": self.public_message(),
        });

        (status, Json(error_response)).into_response()
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<EngagementError> for GatewayError {
    fn from(error: EngagementError) -> Self {
        match error {
            EngagementError::Validation { message } => GatewayError::InvalidRequest(message),
            EngagementError::EventNotFound { id } => GatewayError::NotFound(format!("Event {id}")),
            EngagementError::MessageNotFound { id } => {
                GatewayError::NotFound(format!("Message {id}"))
            }
            EngagementError::NotificationNotFound { id } => {
                GatewayError::NotFound(format!("Notification {id}"))
            }
            EngagementError::Conflict { message } => GatewayError::Conflict(message),
            EngagementError::Upstream { message } => GatewayError::Upstream(message),
            EngagementError::Database(err) => GatewayError::DatabaseError(err.to_string()),
        }
    }
}
