//! REST API module using Axum
//!
//! The HTTP surface over the diagnostic engine. The model artifact is
//! loaded once before the router is built; every request shares it
//! read-only through [`ApiState`] — there is no reload path.

pub mod envelope;
pub mod handlers;
mod routes;

pub use handlers::ApiState;

use anyhow::{Context, Result};
use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build a CORS layer that is restrictive by default (same-origin only).
///
/// Set `SENTINEL_CORS_ORIGINS` to a comma-separated list of allowed origins
/// for development dashboards.
fn build_cors_layer() -> CorsLayer {
    match std::env::var("SENTINEL_CORS_ORIGINS") {
        Ok(origins) => {
            let allowed: Vec<_> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            tracing::info!(origins = %origins, "CORS: allowing configured origins");
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE])
        }
        Err(_) => CorsLayer::new()
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
    }
}

/// Create the complete application router.
pub fn create_app(state: ApiState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes(state))
        .merge(routes::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
}

/// Bind and serve until the process is stopped.
pub async fn serve(addr: &str, state: ApiState) -> Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind to {addr}"))?;
    tracing::info!(addr, "Diagnostic API listening");
    axum::serve(listener, app)
        .await
        .context("server terminated unexpectedly")
}
