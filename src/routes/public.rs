use crate::AppState;
use axum::{Router, routing::get};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any
/// client. The image registry exposes nothing publicly; the only open
/// endpoint is the service health probe.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load
        // balancer checks. Returns "ok" immediately to verify the service
        // is running and responsive.
        .route("/health", get(|| async { "ok" }))
}
