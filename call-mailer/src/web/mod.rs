//! HTTP surface: the call event webhook plus liveness endpoints.
//!
//! ```text
//! POST /webhook  → 200 "Webhook received", pipeline runs detached
//! GET  /         → 200 plain text
//! GET  /health   → 200 {"status":"ok"}
//! ```

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{health, root, webhook, AppState, HealthResponse, ROOT_MESSAGE, WEBHOOK_ACK};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/webhook", post(webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
