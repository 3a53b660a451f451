//! Report sheet endpoints.
//!
//! A report sheet is named by the caller and accumulates one calculated row
//! per standard value. The summary table and the annexure are both derived
//! from the current rows.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shared::models::{
    calculate_rows, Annexure, AnnexureDetails, CalculationBatch, Parameter, ReferenceMode,
    ReportRow, SummaryRow,
};
use shared::storage::ReportStoreError;

use super::error::ApiError;
use crate::state::AppState;

/// Request body for calculating and adding rows to a sheet.
#[derive(Debug, Deserialize)]
pub struct AddRowsRequest {
    /// Quantity being calibrated.
    pub parameter: Parameter,
    /// Unit of the range setting.
    pub range_unit: String,
    /// Range setting of the equipment under calibration.
    pub range_value: f64,
    /// Unit of the standard values.
    pub standard_unit: String,
    /// Standard values, one row each.
    pub standard_values: Vec<f64>,
    /// Readings shared by all rows.
    pub indicated_readings: Vec<Option<f64>>,
    /// Resolution of the equipment under calibration.
    pub resolution: f64,
    /// Uncertainty of the reference standard.
    pub reference_uncertainty: f64,
    /// Accuracy specification contribution (optional, defaults to 0).
    #[serde(default)]
    pub accuracy_uncertainty: f64,
    /// CMC bound in percent (optional, server default otherwise).
    pub cmc_percent: Option<f64>,
    /// Reference mode (optional, server default otherwise).
    pub mode: Option<ReferenceMode>,
}

impl AddRowsRequest {
    fn into_batch(self, default_cmc_percent: f64) -> CalculationBatch {
        CalculationBatch {
            parameter: self.parameter,
            range_unit: self.range_unit,
            range_value: self.range_value,
            standard_unit: self.standard_unit,
            standard_values: self.standard_values,
            indicated_readings: self.indicated_readings,
            resolution: self.resolution,
            reference_uncertainty: self.reference_uncertainty,
            accuracy_uncertainty: self.accuracy_uncertainty,
            cmc_percent: self.cmc_percent.unwrap_or(default_cmc_percent),
        }
    }
}

/// Response after adding rows.
#[derive(Debug, Serialize, Deserialize)]
pub struct AddRowsResponse {
    /// Number of rows added by this request.
    pub added: usize,
    /// Number of rows now in the sheet.
    pub total_rows: usize,
    /// Message describing the result.
    pub message: String,
}

/// A sheet with its detailed rows and summary.
#[derive(Debug, Serialize, Deserialize)]
pub struct SheetResponse {
    /// Sheet name.
    pub sheet: String,
    /// Detailed calculation rows.
    pub rows: Vec<ReportRow>,
    /// Numbered summary table.
    pub summary: Vec<SummaryRow>,
}

/// List of sheet names.
#[derive(Debug, Serialize, Deserialize)]
pub struct SheetListResponse {
    /// Names of all sheets.
    pub sheets: Vec<String>,
}

/// Response after removing one row.
#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveRowResponse {
    /// The removed row.
    pub removed: ReportRow,
    /// Summary after renumbering.
    pub summary: Vec<SummaryRow>,
}

/// Creates the report sheet routes.
///
/// # Routes
///
/// - `GET /api/v1/reports` - List sheet names
/// - `GET /api/v1/reports/{sheet}` - Rows and summary of a sheet
/// - `DELETE /api/v1/reports/{sheet}` - Delete a sheet
/// - `POST /api/v1/reports/{sheet}/rows` - Calculate and add rows
/// - `DELETE /api/v1/reports/{sheet}/rows` - Remove every row
/// - `DELETE /api/v1/reports/{sheet}/rows/{index}` - Remove one row
/// - `POST /api/v1/reports/{sheet}/annexure` - Build annexure data
pub fn report_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/reports", get(list_sheets))
        .route(
            "/api/v1/reports/{sheet}",
            get(get_sheet).delete(delete_sheet),
        )
        .route(
            "/api/v1/reports/{sheet}/rows",
            post(add_rows).delete(clear_rows),
        )
        .route("/api/v1/reports/{sheet}/rows/{index}", delete(remove_row))
        .route("/api/v1/reports/{sheet}/annexure", post(build_annexure))
        .with_state(state)
}

/// Handler for GET /api/v1/reports.
async fn list_sheets(State(state): State<AppState>) -> Result<Json<SheetListResponse>, ApiError> {
    let sheets = state.report_store().names()?;
    Ok(Json(SheetListResponse { sheets }))
}

/// Handler for GET /api/v1/reports/{sheet}.
async fn get_sheet(
    State(state): State<AppState>,
    Path(sheet): Path<String>,
) -> Result<Json<SheetResponse>, ApiError> {
    let report = state.report_store().get(&sheet)?;
    Ok(Json(SheetResponse {
        summary: report.summary(),
        rows: report.rows().to_vec(),
        sheet,
    }))
}

/// Handler for DELETE /api/v1/reports/{sheet}.
async fn delete_sheet(
    State(state): State<AppState>,
    Path(sheet): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.report_store().delete(&sheet)? {
        tracing::info!(%sheet, "Deleted report sheet");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ReportStoreError::NotFound(sheet).into())
    }
}

/// Handler for POST /api/v1/reports/{sheet}/rows.
///
/// Calculates one row per positive standard value. Returns 201 Created with
/// the number of rows added; nothing is added if any input is invalid.
async fn add_rows(
    State(state): State<AppState>,
    Path(sheet): Path<String>,
    payload: Result<Json<AddRowsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AddRowsResponse>), ApiError> {
    let Json(request) = payload?;
    let mode = request.mode.unwrap_or(state.reference_mode());
    let batch = request.into_batch(state.default_cmc_percent());

    let rows = calculate_rows(&batch, mode)?;
    let added = rows.len();
    let total_rows = state.report_store().append(&sheet, rows)?;

    tracing::info!(%sheet, %mode, added, total_rows, "Added report rows");

    Ok((
        StatusCode::CREATED,
        Json(AddRowsResponse {
            added,
            total_rows,
            message: format!(
                "Successfully calculated and added {added} {}",
                if added == 1 { "row" } else { "rows" }
            ),
        }),
    ))
}

/// Handler for DELETE /api/v1/reports/{sheet}/rows.
async fn clear_rows(
    State(state): State<AppState>,
    Path(sheet): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.report_store().clear(&sheet)?;
    tracing::info!(%sheet, "Cleared report sheet");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE /api/v1/reports/{sheet}/rows/{index}.
async fn remove_row(
    State(state): State<AppState>,
    Path((sheet, index)): Path<(String, usize)>,
) -> Result<Json<RemoveRowResponse>, ApiError> {
    let (removed, summary) = state.report_store().remove_row(&sheet, index)?;
    Ok(Json(RemoveRowResponse { removed, summary }))
}

/// Handler for POST /api/v1/reports/{sheet}/annexure.
async fn build_annexure(
    State(state): State<AppState>,
    Path(sheet): Path<String>,
    payload: Result<Json<AnnexureDetails>, JsonRejection>,
) -> Result<Json<Annexure>, ApiError> {
    let Json(details) = payload?;
    let summary = state.report_store().get(&sheet)?.summary();
    let annexure = Annexure::build(details, &summary)?;

    tracing::info!(
        %sheet,
        filename = %annexure.filename,
        results = annexure.results.len(),
        "Built annexure"
    );

    Ok(Json(annexure))
}
