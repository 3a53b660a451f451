//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared functionality used across all integration tests,
//! including test app setup, request bodies, and HTTP request helpers.

use std::sync::Arc;

use api::{create_router, AppState, DEFAULT_CMC_PERCENT};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use shared::models::ReferenceMode;
use shared::storage::{InMemoryReportStore, InMemoryScopeStore};

/// Scope export used to seed the scope store.
pub const SCOPE_JSON: &str = r#"[
    {
        "Nature": "Electro-Technical",
        "Measurand or Reference": "DC Voltage",
        "Calibration or Measurement Method": "Source, Using Multifunction Calibrator",
        "Measurement Range and Additional Parameters": "1 mV to 1000 V",
        "CMC (Upper Bound)": "0.05 %"
    },
    {
        "Nature": "Electro-Technical",
        "Measurand or Reference": "Insulation Resistance",
        "Calibration or Measurement Method": "Source, Using Decade Megaohm Box",
        "Measurement Range and Additional Parameters": "1 MΩ to 10 GΩ",
        "CMC (Upper Bound)": 1.2
    },
    {
        "Nature": "Thermal",
        "Measurand or Reference": "Temperature",
        "Calibration or Measurement Method": "Comparison",
        "Measurement Range and Additional Parameters": "-40 °C to 150 °C",
        "CMC (Upper Bound)": "0.8"
    }
]"#;

/// Creates a test router with fresh in-memory stores.
///
/// # Returns
///
/// A tuple containing the configured router and the app state.
pub fn test_app() -> (Router, AppState) {
    let state = AppState::with_in_memory_store();
    let router = create_router(state.clone());
    (router, state)
}

/// Creates a test router whose scope store is seeded with [`SCOPE_JSON`].
pub fn test_app_with_scope() -> Router {
    let scope = InMemoryScopeStore::from_json_str(SCOPE_JSON).unwrap();
    let state = AppState::new(
        Arc::new(InMemoryReportStore::new()),
        Arc::new(scope),
        ReferenceMode::default(),
        DEFAULT_CMC_PERCENT,
    );
    create_router(state)
}

/// Body for adding rows of an insulation tester calibration: a 500 V test
/// range checked against megaohm standards.
pub fn insulation_rows(standard_values: &[f64]) -> Value {
    json!({
        "parameter": "Voltage",
        "range_unit": "V",
        "range_value": 500.0,
        "standard_unit": "MΩ",
        "standard_values": standard_values,
        "indicated_readings": [10.0, 10.5, 9.5, 10.25, 9.75],
        "resolution": 0.1,
        "reference_uncertainty": 0.2,
        "cmc_percent": 1.0
    })
}

/// Administrative details for an annexure.
pub fn annexure_details() -> Value {
    json!({
        "date_of_calibration": "2024-09-24",
        "next_calibration_due": "2025-09-23",
        "description_sample": "Digital Insulation Tester",
        "description_make": "RISHABH",
        "serial_no": "2411091563",
        "method_used": "High Resistance/01",
        "env_temperature": "25 ± 4",
        "env_humidity": "30 - 75",
        "identification_mark": "25EL16E6N",
        "parameter": "Insulation Resistance",
        "euc_note": "Indicated value is the average of 5 readings"
    })
}

/// Helper to make a POST request with JSON body.
///
/// # Arguments
///
/// * `app` - The Axum router to send the request to
/// * `uri` - The URI path to POST to
/// * `body` - The JSON body to send
///
/// # Returns
///
/// A tuple containing the response status code and parsed JSON response body.
pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();
    send(app, request).await
}

/// Helper to make a POST request with a raw body.
pub async fn post_raw(app: Router, uri: &str, body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// Helper to make a GET request.
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Helper to make a DELETE request.
pub async fn delete(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}
