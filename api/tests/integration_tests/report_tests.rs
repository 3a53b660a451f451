//! Integration tests for report sheets and annexure building.
//!
//! Tests cover:
//! - Accumulating rows across requests
//! - Removing rows and renumbering the summary
//! - Sheet isolation
//! - Unit validation
//! - Annexure formatting, file naming and validation

use axum::http::StatusCode;
use serde_json::json;

use super::common::{annexure_details, delete, get, insulation_rows, post_json, test_app};

#[tokio::test]
async fn test_rows_accumulate_across_requests() {
    let (app, state) = test_app();

    let (status, response) = post_json(
        app.clone(),
        "/api/v1/reports/dit-500v/rows",
        insulation_rows(&[10.0, 20.0]),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["added"], 2);

    let (status, response) = post_json(
        app.clone(),
        "/api/v1/reports/dit-500v/rows",
        insulation_rows(&[0.0, 50.0]),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["added"], 1);
    assert_eq!(response["total_rows"], 3);

    let (status, response) = get(app, "/api/v1/reports/dit-500v").await;
    assert_eq!(status, StatusCode::OK);

    let summary = response["summary"].as_array().unwrap();
    assert_eq!(summary.len(), 3);
    assert_eq!(summary[2]["sl_no"], 3);
    assert_eq!(summary[2]["standard_value"], 50.0);
    assert_eq!(summary[0]["range_unit"], "V");
    assert_eq!(summary[0]["standard_unit"], "MΩ");

    // The stored sheet is the same one the API reports
    assert_eq!(state.report_store().get("dit-500v").unwrap().len(), 3);
}

#[tokio::test]
async fn test_summary_applies_cmc_floor() {
    let (app, _state) = test_app();

    post_json(
        app.clone(),
        "/api/v1/reports/floor/rows",
        insulation_rows(&[10.0, 50.0]),
    )
    .await;

    let (_, response) = get(app, "/api/v1/reports/floor").await;
    let rows = response["rows"].as_array().unwrap();
    let summary = response["summary"].as_array().unwrap();

    // 10 MΩ: the calculated expanded uncertainty exceeds the 1 % CMC
    let expanded = rows[0]["budget"]["expanded_uncertainty"].as_f64().unwrap();
    assert!((summary[0]["expanded_uncertainty"].as_f64().unwrap() - expanded).abs() < 1e-12);

    // 50 MΩ: the CMC of 0.5 MΩ is larger and is reported instead
    assert!((summary[1]["expanded_uncertainty"].as_f64().unwrap() - 0.5).abs() < 1e-12);
}

#[tokio::test]
async fn test_remove_row_renumbers_summary() {
    let (app, _state) = test_app();

    post_json(
        app.clone(),
        "/api/v1/reports/bench/rows",
        insulation_rows(&[10.0, 20.0, 30.0]),
    )
    .await;

    let (status, response) = delete(app.clone(), "/api/v1/reports/bench/rows/0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["removed"]["standard_value"], 10.0);

    let (_, response) = get(app, "/api/v1/reports/bench").await;
    let summary = response["summary"].as_array().unwrap();
    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0]["sl_no"], 1);
    assert_eq!(summary[0]["standard_value"], 20.0);
}

#[tokio::test]
async fn test_sheets_are_isolated() {
    let (app, _state) = test_app();

    post_json(app.clone(), "/api/v1/reports/a/rows", insulation_rows(&[10.0])).await;
    post_json(
        app.clone(),
        "/api/v1/reports/b/rows",
        insulation_rows(&[10.0, 20.0]),
    )
    .await;

    let (status, _) = delete(app.clone(), "/api/v1/reports/a/rows").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, a) = get(app.clone(), "/api/v1/reports/a").await;
    let (_, b) = get(app.clone(), "/api/v1/reports/b").await;
    assert!(a["rows"].as_array().unwrap().is_empty());
    assert_eq!(b["rows"].as_array().unwrap().len(), 2);

    let (status, _) = delete(app.clone(), "/api/v1/reports/b").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, sheets) = get(app, "/api/v1/reports").await;
    assert_eq!(sheets["sheets"], json!(["a"]));
}

#[tokio::test]
async fn test_invalid_batch_adds_nothing() {
    let (app, _state) = test_app();

    post_json(app.clone(), "/api/v1/reports/bench/rows", insulation_rows(&[10.0])).await;

    let mut body = insulation_rows(&[20.0, 30.0]);
    body["reference_uncertainty"] = json!(-1.0);
    let (status, response) = post_json(app.clone(), "/api/v1/reports/bench/rows", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_parameter");

    let (_, response) = get(app, "/api/v1/reports/bench").await;
    assert_eq!(response["rows"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_parameter_rejected() {
    let (app, _state) = test_app();

    let mut body = insulation_rows(&[10.0]);
    body["parameter"] = json!("Pressure");
    let (status, response) = post_json(app, "/api/v1/reports/bench/rows", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_json");
}

#[tokio::test]
async fn test_range_unit_must_belong_to_parameter() {
    let (app, _state) = test_app();

    let mut body = insulation_rows(&[10.0]);
    body["range_unit"] = json!("MΩ");
    let (status, response) = post_json(app.clone(), "/api/v1/reports/bench/rows", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_parameter");

    let (status, _) = get(app, "/api/v1/reports/bench").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_annexure_from_sheet() {
    let (app, _state) = test_app();

    post_json(
        app.clone(),
        "/api/v1/reports/dit/rows",
        insulation_rows(&[10.0, 50.0]),
    )
    .await;

    let (status, response) =
        post_json(app, "/api/v1/reports/dit/annexure", annexure_details()).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(response["filename"], "Annexure_25EL16E6N");
    assert_eq!(response["date_of_calibration"], "24.09.2024");
    assert_eq!(response["next_calibration_due"], "23.09.2025");
    assert_eq!(response["details"]["description_make"], "RISHABH");
    assert!(response["coverage_statement"]
        .as_str()
        .unwrap()
        .contains("k=2"));

    let results = response["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["range_value"], "500.0");
    assert_eq!(results[0]["standard_value"], "10.0 MΩ");
    assert_eq!(results[0]["indicated_value"], "10.0 MΩ");
    assert_eq!(results[1]["uncertainty_value"], "0.5000 MΩ");
}

#[tokio::test]
async fn test_annexure_rejects_bad_dates() {
    let (app, _state) = test_app();

    post_json(app.clone(), "/api/v1/reports/dit/rows", insulation_rows(&[10.0])).await;

    let mut details = annexure_details();
    details["next_calibration_due"] = json!("2024-01-01");
    let (status, response) = post_json(app, "/api/v1/reports/dit/annexure", details).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "validation_failed");
}

#[tokio::test]
async fn test_annexure_filename_override() {
    let (app, _state) = test_app();

    post_json(app.clone(), "/api/v1/reports/dit/rows", insulation_rows(&[10.0])).await;

    let mut details = annexure_details();
    details["filename"] = json!("DIT_2411091563");
    let (status, response) =
        post_json(app.clone(), "/api/v1/reports/dit/annexure", details).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["filename"], "DIT_2411091563");

    let mut details = annexure_details();
    details["filename"] = json!("../DIT");
    let (status, response) = post_json(app, "/api/v1/reports/dit/annexure", details).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "validation_failed");
}

#[tokio::test]
async fn test_annexure_for_missing_sheet() {
    let (app, _state) = test_app();

    let (status, response) =
        post_json(app, "/api/v1/reports/nope/annexure", annexure_details()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "not_found");
}
