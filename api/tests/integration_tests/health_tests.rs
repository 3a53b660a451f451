//! Integration tests for health check and general API functionality.
//!
//! Tests cover:
//! - Health check endpoint
//! - Empty store behavior
//! - Parameter catalogue

use axum::http::StatusCode;

use super::common::{get, test_app, test_app_with_scope};

#[tokio::test]
async fn test_health_check() {
    let (app, _state) = test_app();

    let (status, response) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert_eq!(response["service"], "calbudget-api");
    assert_eq!(response["scope_entries"], 0);
}

#[tokio::test]
async fn test_health_reports_loaded_scope() {
    let (status, response) = get(test_app_with_scope(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["scope_entries"], 3);
}

#[tokio::test]
async fn test_empty_stores_return_empty_results() {
    let (app, _state) = test_app();

    let (status, response) = get(app.clone(), "/api/v1/reports").await;
    assert_eq!(status, StatusCode::OK);
    assert!(response["sheets"].as_array().unwrap().is_empty());

    let (status, response) = get(app.clone(), "/api/v1/scope").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_count"], 0);

    let (status, response) = get(app, "/api/v1/reports/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "not_found");
}

#[tokio::test]
async fn test_parameter_catalogue() {
    let (app, _state) = test_app();

    let (status, response) = get(app, "/api/v1/parameters").await;
    assert_eq!(status, StatusCode::OK);

    let parameters = response["parameters"].as_array().unwrap();
    assert_eq!(parameters.len(), 6);
    assert_eq!(parameters[1]["parameter"], "Voltage");
    assert_eq!(parameters[1]["units"][1], "V");

    let all_units = response["all_units"].as_array().unwrap();
    assert!(all_units.iter().any(|u| u == "MΩ"));
    assert!(all_units.iter().any(|u| u == "Hz"));
}
