//! Uncertainty budget endpoint.
//!
//! Computes a single budget without storing anything.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shared::calculator;
use shared::models::{CalibrationObservation, ReferenceMode, UncertaintyBudget};

use super::error::ApiError;
use crate::state::AppState;

/// Request body for a budget calculation.
///
/// `cmc_percent` and `mode` fall back to the server defaults.
#[derive(Debug, Deserialize)]
pub struct BudgetRequest {
    /// Nominal value of the reference standard.
    pub standard_value: f64,
    /// Readings indicated by the equipment under calibration; `null` entries are skipped.
    pub indicated_readings: Vec<Option<f64>>,
    /// Resolution of the equipment under calibration.
    pub resolution: f64,
    /// Uncertainty of the reference standard.
    pub reference_uncertainty: f64,
    /// Accuracy specification contribution (optional, defaults to 0).
    #[serde(default)]
    pub accuracy_uncertainty: f64,
    /// CMC bound in percent (optional).
    pub cmc_percent: Option<f64>,
    /// Reference mode (optional).
    pub mode: Option<ReferenceMode>,
}

impl BudgetRequest {
    fn into_observation(self, default_cmc_percent: f64) -> CalibrationObservation {
        CalibrationObservation {
            standard_value: self.standard_value,
            indicated_readings: self.indicated_readings,
            resolution: self.resolution,
            reference_uncertainty: self.reference_uncertainty,
            accuracy_uncertainty: self.accuracy_uncertainty,
            cmc_percent: self.cmc_percent.unwrap_or(default_cmc_percent),
        }
    }
}

/// Response for a budget calculation.
#[derive(Debug, Serialize, Deserialize)]
pub struct BudgetResponse {
    /// Reference mode the budget was computed with.
    pub mode: ReferenceMode,
    /// CMC bound that was applied.
    pub cmc_percent: f64,
    /// The computed budget.
    pub budget: UncertaintyBudget,
}

/// Creates the budget routes.
///
/// # Routes
///
/// - `POST /api/v1/budgets` - Compute one uncertainty budget
pub fn budget_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/budgets", post(compute_budget))
        .with_state(state)
}

/// Handler for POST /api/v1/budgets.
async fn compute_budget(
    State(state): State<AppState>,
    payload: Result<Json<BudgetRequest>, JsonRejection>,
) -> Result<Json<BudgetResponse>, ApiError> {
    let Json(request) = payload?;
    let mode = request.mode.unwrap_or(state.reference_mode());
    let observation = request.into_observation(state.default_cmc_percent());

    let budget = calculator::compute(&observation, mode)?;

    tracing::debug!(
        %mode,
        standard_value = observation.standard_value,
        readings = budget.reading_count,
        reported = budget.reported_uncertainty,
        "Computed uncertainty budget"
    );

    Ok(Json(BudgetResponse {
        mode,
        cmc_percent: observation.cmc_percent,
        budget,
    }))
}
