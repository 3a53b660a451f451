//! Health check endpoint.
//!
//! Reports liveness along with the calculation defaults the server is running
//! with, so a client can tell which reference mode applies to its requests.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use shared::models::ReferenceMode;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status (always "healthy" if reachable).
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Reference mode applied when a request names none.
    pub reference_mode: ReferenceMode,
    /// CMC bound applied when a request carries none.
    pub default_cmc_percent: f64,
    /// Number of loaded accreditation scope entries, if the store is readable.
    pub scope_entries: Option<usize>,
}

/// Creates the health check routes.
pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let scope_entries = match state.scope_store().count() {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!(error = %e, "Scope store unavailable for health check");
            None
        }
    };

    Json(HealthResponse {
        status: "healthy",
        service: "calbudget-api",
        version: env!("CARGO_PKG_VERSION"),
        reference_mode: state.reference_mode(),
        default_cmc_percent: state.default_cmc_percent(),
        scope_entries,
    })
}
