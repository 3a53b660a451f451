//! Integration tests for the budget calculation endpoint.
//!
//! Tests cover:
//! - The worked voltage example
//! - CMC floor behavior
//! - Input rejection

use axum::http::StatusCode;
use serde_json::json;

use super::common::{post_json, post_raw, test_app};

fn approx(value: &serde_json::Value, expected: f64, tolerance: f64) -> bool {
    value
        .as_f64()
        .is_some_and(|v| (v - expected).abs() <= tolerance)
}

#[tokio::test]
async fn test_voltage_budget() {
    let (app, _state) = test_app();

    let (status, response) = post_json(
        app,
        "/api/v1/budgets",
        json!({
            "standard_value": 100.0,
            "indicated_readings": [100.1, 99.9, 100.0],
            "resolution": 0.1,
            "reference_uncertainty": 0.5,
            "accuracy_uncertainty": 0.0,
            "cmc_percent": 1.0
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let budget = &response["budget"];
    assert_eq!(budget["reading_count"], 3);
    assert!(approx(&budget["average_indicated"], 100.0, 1e-9));
    assert!(approx(&budget["percent_error"], 0.0, 1e-9));
    assert!(approx(&budget["type_a_uncertainty"], 0.0577, 1e-4));
    assert!(approx(&budget["standard_contribution"], 0.25, 1e-12));
    assert!(approx(&budget["resolution_contribution"], 0.0289, 1e-4));
    assert!(approx(&budget["combined_uncertainty"], (1.0_f64 / 15.0).sqrt(), 1e-9));
    assert!(approx(&budget["cmc_absolute"], 1.0, 1e-12));
    assert!(approx(&budget["reported_uncertainty"], 1.0, 1e-12));
}

#[tokio::test]
async fn test_reported_never_below_expanded() {
    let (app, _state) = test_app();

    let (status, response) = post_json(
        app,
        "/api/v1/budgets",
        json!({
            "standard_value": 10.0,
            "indicated_readings": [10.0, 10.2, 9.8, 10.1, 9.9],
            "resolution": 0.1,
            "reference_uncertainty": 0.2,
            "cmc_percent": 0.1
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let budget = &response["budget"];
    let expanded = budget["expanded_uncertainty"].as_f64().unwrap();
    let reported = budget["reported_uncertainty"].as_f64().unwrap();
    assert!((reported - expanded).abs() < 1e-12);
    assert!(reported > budget["cmc_absolute"].as_f64().unwrap());
}

#[tokio::test]
async fn test_server_default_mode_can_be_overridden() {
    let (app, _state) = test_app();

    let (status, response) = post_json(
        app,
        "/api/v1/budgets",
        json!({
            "standard_value": 100.0,
            "indicated_readings": [100.0, 100.0],
            "resolution": 0.0,
            "reference_uncertainty": 0.01,
            "cmc_percent": 0.0,
            "mode": "fraction_of_mean"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["mode"], "fraction_of_mean");
    assert!(approx(&response["budget"]["standard_uncertainty"], 1.0, 1e-9));
    assert!(approx(&response["budget"]["standard_contribution"], 0.5, 1e-9));
}

#[tokio::test]
async fn test_negative_resolution_rejected() {
    let (app, _state) = test_app();

    let (status, response) = post_json(
        app,
        "/api/v1/budgets",
        json!({
            "standard_value": 100.0,
            "indicated_readings": [100.0],
            "resolution": -0.1,
            "reference_uncertainty": 0.5
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_parameter");
}

#[tokio::test]
async fn test_empty_readings_rejected() {
    let (app, _state) = test_app();

    let (status, response) = post_json(
        app,
        "/api/v1/budgets",
        json!({
            "standard_value": 100.0,
            "indicated_readings": [],
            "resolution": 0.1,
            "reference_uncertainty": 0.5
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "empty_input");
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let (app, _state) = test_app();

    let (status, response) = post_raw(app, "/api/v1/budgets", r#"{"standard_value": "#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_json");
}
