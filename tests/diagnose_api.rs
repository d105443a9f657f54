//! API Regression Tests
//!
//! Exercises the HTTP surface in-process via `tower::ServiceExt::oneshot`:
//! envelope shape, the diagnose happy path, input-domain rejection, and
//! model metadata.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use compressor_sentinel::api::{create_app, ApiState};
use compressor_sentinel::dataset::generate_synthetic;
use compressor_sentinel::forest::{
    evaluate, fit_forest, stratified_split, ForestArtifact, ForestParams,
};
use compressor_sentinel::report::DiagnosticEngine;
use compressor_sentinel::FEATURE_NAMES;

fn test_state() -> ApiState {
    let dataset = generate_synthetic(150, 42);
    let (train, test) = stratified_split(&dataset, 0.2, 42);
    let params = ForestParams {
        n_trees: 10,
        ..ForestParams::default()
    };
    let forest = fit_forest(&train, &params);
    let eval = evaluate(&forest, &test);
    let artifact = ForestArtifact::new(forest, &params, &eval, train.len());
    ApiState {
        engine: DiagnosticEngine::new(Arc::new(artifact)),
    }
}

fn diagnose_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/diagnose")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_app(test_state());
    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let v = body_json(resp).await;
    assert_eq!(v["data"]["status"], "ok");
}

#[tokio::test]
async fn test_diagnose_scenario_reading() {
    let app = create_app(test_state());
    let resp = app
        .oneshot(diagnose_request(serde_json::json!({
            "motor_current_a": 65.0,
            "oil_temperature_c": 95.0,
            "line_pressure_bar": 2.6,
            "filter_delta_p_bar": 0.3,
            "running_hours": 1000,
            "vibration_mm_s": 5.0
        })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let v = body_json(resp).await;
    let report = &v["data"];
    assert_eq!(report["motor_current"]["band"], "Warning");
    assert_eq!(report["oil_temperature"]["band"], "Warning");
    assert_eq!(report["line_pressure"]["band"], "Warning");
    assert_eq!(report["filter_delta_p"]["band"], "Warning");
    assert_eq!(report["filter_delta_p"]["qualifier"], "Filter clogging");
    assert_eq!(report["running_hours"]["band"], "Normal");
    assert_eq!(report["vibration"]["band"], "Warning");
    assert_eq!(report["fault_cause"], "Air leak or Airend wear");

    // Overall severity comes from the artifact; assert only enum membership
    let overall = report["overall_severity"].as_str().unwrap();
    assert!(["Normal", "Warning", "Critical"].contains(&overall));
    assert!(report["action"].as_str().unwrap().len() > 0);
}

#[tokio::test]
async fn test_diagnose_rejects_negative_reading() {
    let app = create_app(test_state());
    let resp = app
        .oneshot(diagnose_request(serde_json::json!({
            "motor_current_a": -5.0,
            "oil_temperature_c": 75.0,
            "line_pressure_bar": 3.0,
            "filter_delta_p_bar": 0.1,
            "running_hours": 100,
            "vibration_mm_s": 2.0
        })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let v = body_json(resp).await;
    assert_eq!(v["error"]["code"], "BAD_REQUEST");
    assert!(v["error"]["message"]
        .as_str()
        .unwrap()
        .contains("motor_current_a"));
}

#[tokio::test]
async fn test_diagnose_is_idempotent() {
    let state = test_state();
    let body = serde_json::json!({
        "motor_current_a": 40.0,
        "oil_temperature_c": 75.0,
        "line_pressure_bar": 3.0,
        "filter_delta_p_bar": 0.1,
        "running_hours": 500,
        "vibration_mm_s": 2.0
    });

    let resp_a = create_app(state.clone())
        .oneshot(diagnose_request(body.clone()))
        .await
        .unwrap();
    let resp_b = create_app(state)
        .oneshot(diagnose_request(body))
        .await
        .unwrap();

    let a = body_json(resp_a).await;
    let b = body_json(resp_b).await;
    assert_eq!(a["data"], b["data"]);
}

#[tokio::test]
async fn test_model_info_reports_schema() {
    let app = create_app(test_state());
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/model")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let v = body_json(resp).await;
    let names: Vec<&str> = v["data"]["feature_names"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n.as_str().unwrap())
        .collect();
    assert_eq!(names, FEATURE_NAMES);
    assert_eq!(v["data"]["n_trees"], 10);
    assert_eq!(v["data"]["schema_version"], 1);
}
