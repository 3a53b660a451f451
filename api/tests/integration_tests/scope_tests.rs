//! Integration tests for accreditation scope browsing.
//!
//! Tests cover:
//! - Multi-select filters on text columns
//! - CMC ceiling and pagination
//! - Filter value listing
//! - Single entry lookup

use axum::http::StatusCode;

use super::common::{get, test_app_with_scope};

fn filter(values: &[&str]) -> String {
    urlencoding::encode(&values.join("|")).into_owned()
}

#[tokio::test]
async fn test_scope_returns_all_entries() {
    let (status, response) = get(test_app_with_scope(), "/api/v1/scope").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_count"], 3);
    let first = &response["entries"][0];
    assert_eq!(first["index"], 0);
    assert_eq!(first["Nature"], "Electro-Technical");
    assert_eq!(first["CMC (Upper Bound)"], 0.05);
}

#[tokio::test]
async fn test_scope_multi_select() {
    let uri = format!(
        "/api/v1/scope?measurand={}",
        filter(&["DC Voltage", "Temperature"])
    );
    let (status, response) = get(test_app_with_scope(), &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_count"], 2);
    let indexes: Vec<u64> = response["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["index"].as_u64().unwrap())
        .collect();
    assert_eq!(indexes, vec![0, 2]);
}

#[tokio::test]
async fn test_scope_values_with_commas() {
    let uri = format!(
        "/api/v1/scope?method={}",
        filter(&["Source, Using Decade Megaohm Box"])
    );
    let (_, response) = get(test_app_with_scope(), &uri).await;

    assert_eq!(response["total_count"], 1);
    assert_eq!(
        response["entries"][0]["Measurand or Reference"],
        "Insulation Resistance"
    );
}

#[tokio::test]
async fn test_scope_filters_are_combined() {
    let uri = format!(
        "/api/v1/scope?nature={}&max_cmc_percent=1.0",
        filter(&["Electro-Technical"])
    );
    let (_, response) = get(test_app_with_scope(), &uri).await;

    assert_eq!(response["total_count"], 1);
    assert_eq!(response["entries"][0]["index"], 0);
}

#[tokio::test]
async fn test_scope_pagination() {
    let (_, response) = get(test_app_with_scope(), "/api/v1/scope?limit=1&offset=1").await;

    assert_eq!(response["total_count"], 3);
    let entries = response["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["index"], 1);
}

#[tokio::test]
async fn test_scope_filter_values() {
    let (status, response) = get(test_app_with_scope(), "/api/v1/scope/filters").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        response["nature"],
        serde_json::json!(["Electro-Technical", "Thermal"])
    );
    assert_eq!(response["range"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_scope_entry_lookup() {
    let app = test_app_with_scope();

    let (status, response) = get(app.clone(), "/api/v1/scope/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["Measurand or Reference"], "Temperature");
    assert_eq!(response["CMC (Upper Bound)"], 0.8);

    let (status, response) = get(app, "/api/v1/scope/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "not_found");
}
