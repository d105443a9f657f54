//! API route definitions
//!
//! - POST /api/v1/diagnose — full diagnostic report for one reading
//! - GET  /api/v1/model    — loaded artifact provenance
//! - GET  /health          — liveness probe

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{self, ApiState};

/// Versioned API routes.
pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/diagnose", post(handlers::post_diagnose))
        .route("/model", get(handlers::get_model_info))
        .with_state(state)
}

/// Root-level health endpoint.
pub fn health_routes() -> Router {
    Router::new().route("/health", get(handlers::get_health))
}
