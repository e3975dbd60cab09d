//! # Rally Gateway Crate
//!
//! This crate provides the HTTP gateway for Rally, routing REST requests to
//! the engagement services.
//!
//! ## Architecture
//!
//! - **REST**: HTTP API endpoints with OpenAPI documentation
//! - **State**: Shared application state holding the services
//! - **Middleware**: Bearer authentication and request logging
//! - **Auth**: JWT issuing and validation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rally_gateway::{create_router, GatewayState};
//!
//! let state = GatewayState::new(pool, &config.auth, dispatcher, summary_provider);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:7070").await?;
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod auth;
pub mod error;
pub mod middleware;
pub mod rest;
pub mod state;

// Re-export main types for convenience
pub use auth::{Claims, JwtManager};
pub use error::{ErrorResponse, GatewayError, GatewayResult};
pub use middleware::auth_middleware;
pub use state::GatewayState;

use axum::{
    http::{header, Method},
    middleware as axum_middleware, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Create the main application router with all routes
pub fn create_router(state: GatewayState) -> Router {
    let arc_state = Arc::new(state);
    let mut router = Router::new()
        .merge(rest::create_rest_routes(arc_state.clone()))
        .with_state(arc_state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        )
        .layer(axum_middleware::from_fn(middleware::logging_middleware));

    // Add Swagger UI if in debug mode
    #[cfg(debug_assertions)]
    {
        use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
        use utoipa::{Modify, OpenApi};
        use utoipa_swagger_ui::SwaggerUi;

        struct BearerAuth;

        impl Modify for BearerAuth {
            fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
                let components = openapi.components.get_or_insert_with(Default::default);
                components.add_security_scheme(
                    "bearer",
                    SecurityScheme::Http(
                        HttpBuilder::new()
                            .scheme(HttpAuthScheme::Bearer)
                            .bearer_format("JWT")
                            .build(),
                    ),
                );
            }
        }

        #[derive(OpenApi)]
        #[openapi(
            paths(
                rest::health::health_check,
                rest::event::create_event,
                rest::event::get_event,
                rest::message::list_messages,
                rest::message::create_message,
                rest::reaction::add_reaction,
                rest::summary::get_summary,
                rest::notification::list_notifications,
                rest::notification::mark_notification_read,
            ),
            components(
                schemas(
                    ErrorResponse,
                    rest::health::HealthResponse,
                    rest::event::EventResponse,
                    rest::event::CreateEventBody,
                    rest::event::CreatedEventResponse,
                    rest::message::MessageResponse,
                    rest::message::CreateMessageBody,
                    rest::reaction::AddReactionBody,
                    rest::summary::SummaryResponse,
                    rest::notification::NotificationResponse,
                )
            ),
            modifiers(&BearerAuth),
            tags(
                (name = "Health", description = "Service health"),
                (name = "Events", description = "Event creation and announcements"),
                (name = "Messages", description = "Event chatrooms"),
                (name = "Reactions", description = "Emoji reactions"),
                (name = "Summaries", description = "AI chat summaries"),
                (name = "Notifications", description = "In-app inbox"),
            )
        )]
        struct ApiDoc;

        router = router
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    router
}
