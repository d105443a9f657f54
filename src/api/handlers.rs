//! API handlers — diagnose, model info, health.
//!
//! All handlers return `Response` via [`ApiResponse::ok`] or
//! [`ApiErrorResponse`]. The shared state is one read-only
//! [`DiagnosticEngine`]; handlers never lock and never mutate.

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::envelope::{ApiErrorResponse, ApiResponse};
use crate::report::{DiagnosticEngine, DiagnosticError};
use crate::types::SensorReading;

/// Shared handler state. Cheap to clone — the engine holds an `Arc` to the
/// loaded artifact.
#[derive(Clone)]
pub struct ApiState {
    pub engine: DiagnosticEngine,
}

/// Model metadata for `GET /api/v1/model`.
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub schema_version: u32,
    pub feature_names: Vec<String>,
    pub n_trees: usize,
    pub trained_at: DateTime<Utc>,
    pub training_rows: usize,
    pub test_accuracy: f64,
}

/// `POST /api/v1/diagnose` — run the full diagnosis for one reading.
pub async fn post_diagnose(State(state): State<ApiState>, Json(reading): Json<SensorReading>) -> Response {
    match state.engine.assemble(&reading) {
        Ok(report) => ApiResponse::ok(report),
        Err(e @ DiagnosticError::InvalidReading { .. }) => {
            tracing::debug!(error = %e, "Rejected out-of-domain reading");
            ApiErrorResponse::bad_request(e.to_string())
        }
        Err(e @ DiagnosticError::ContractViolation(_)) => {
            // Invariant breach inside the artifact — abort loudly.
            tracing::error!(error = %e, "Classifier contract violation");
            ApiErrorResponse::internal(e.to_string())
        }
    }
}

/// `GET /api/v1/model` — provenance of the loaded artifact.
pub async fn get_model_info(State(state): State<ApiState>) -> Response {
    let artifact = state.engine.artifact();
    ApiResponse::ok(ModelInfo {
        schema_version: artifact.schema_version,
        feature_names: artifact.feature_names.clone(),
        n_trees: artifact.metadata.n_trees,
        trained_at: artifact.metadata.trained_at,
        training_rows: artifact.metadata.training_rows,
        test_accuracy: artifact.metadata.test_accuracy,
    })
}

/// `GET /health` — liveness probe. If this answers, the artifact loaded.
pub async fn get_health() -> Response {
    ApiResponse::ok(serde_json::json!({ "status": "ok" }))
}
