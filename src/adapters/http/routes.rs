//! Axum routes for the concierge endpoints.
//!
//! REST Endpoints:
//! - GET /healthz - liveness and catalog size
//! - POST /v1/chat/completions - one dialogue turn

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use super::handlers::{chat_completions, health, ConciergeAppState};

/// Creates the routing table for the concierge endpoints.
pub fn concierge_routes() -> Router<ConciergeAppState> {
    Router::new()
        .route("/healthz", get(health))
        .route("/v1/chat/completions", post(chat_completions))
}

/// Combined router with request tracing attached.
pub fn concierge_router(state: ConciergeAppState) -> Router {
    concierge_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
