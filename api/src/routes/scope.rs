//! Accreditation scope browsing endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shared::models::{ScopeColumn, ScopeEntry};
use shared::storage::{IndexedScopeEntry, ScopeQuery};

use super::error::ApiError;
use crate::state::AppState;

/// Separator between the selected values of one filter.
///
/// Scope values routinely contain commas, so multi-select uses `|`.
pub const FILTER_SEPARATOR: char = '|';

/// Maximum number of entries returned per page.
const MAX_PAGE_SIZE: usize = 500;

/// Query parameters for browsing the scope.
#[derive(Debug, Default, Deserialize)]
pub struct ScopeQueryParams {
    /// Selected natures, `|`-separated.
    pub nature: Option<String>,
    /// Selected measurands, `|`-separated.
    pub measurand: Option<String>,
    /// Selected methods, `|`-separated.
    pub method: Option<String>,
    /// Selected ranges, `|`-separated.
    pub range: Option<String>,
    /// CMC ceiling in percent.
    pub max_cmc_percent: Option<f64>,
    /// Maximum number of results, capped at 500 (the default).
    pub limit: Option<usize>,
    /// Number of results to skip.
    pub offset: Option<usize>,
}

impl ScopeQueryParams {
    fn into_query(self) -> ScopeQuery {
        let mut query = ScopeQuery::new();

        for (column, selected) in [
            (ScopeColumn::Nature, self.nature),
            (ScopeColumn::Measurand, self.measurand),
            (ScopeColumn::Method, self.method),
            (ScopeColumn::Range, self.range),
        ] {
            for value in selected.iter().flat_map(|s| s.split(FILTER_SEPARATOR)) {
                let value = value.trim();
                if !value.is_empty() {
                    query = query.with_value(column, value);
                }
            }
        }

        if let Some(max) = self.max_cmc_percent {
            query = query.with_max_cmc_percent(max);
        }
        query = query.with_limit(self.limit.unwrap_or(MAX_PAGE_SIZE).min(MAX_PAGE_SIZE));
        if let Some(offset) = self.offset {
            query = query.with_offset(offset);
        }
        query
    }
}

/// Response for a scope query.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScopeQueryResponse {
    /// Matching entries.
    pub entries: Vec<IndexedScopeEntry>,
    /// Total number of matches before pagination.
    pub total_count: usize,
}

/// Distinct values of every filterable column.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScopeFiltersResponse {
    /// Natures of calibration.
    pub nature: Vec<String>,
    /// Measurands.
    pub measurand: Vec<String>,
    /// Methods.
    pub method: Vec<String>,
    /// Ranges.
    pub range: Vec<String>,
}

/// Creates the scope routes.
///
/// # Routes
///
/// - `GET /api/v1/scope` - Filter and page through scope entries
/// - `GET /api/v1/scope/filters` - Distinct values for each filter
/// - `GET /api/v1/scope/{index}` - A single entry
pub fn scope_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/scope", get(query_scope))
        .route("/api/v1/scope/filters", get(scope_filters))
        .route("/api/v1/scope/{index}", get(get_scope_entry))
        .with_state(state)
}

async fn query_scope(
    State(state): State<AppState>,
    Query(params): Query<ScopeQueryParams>,
) -> Result<Json<ScopeQueryResponse>, ApiError> {
    let query = params.into_query();
    let result = state.scope_store().query(&query)?;

    tracing::debug!(
        total_count = result.total_count,
        returned = result.entries.len(),
        "Queried accreditation scope"
    );

    Ok(Json(ScopeQueryResponse {
        entries: result.entries,
        total_count: result.total_count,
    }))
}

async fn scope_filters(
    State(state): State<AppState>,
) -> Result<Json<ScopeFiltersResponse>, ApiError> {
    let store = state.scope_store();
    Ok(Json(ScopeFiltersResponse {
        nature: store.distinct(ScopeColumn::Nature)?,
        measurand: store.distinct(ScopeColumn::Measurand)?,
        method: store.distinct(ScopeColumn::Method)?,
        range: store.distinct(ScopeColumn::Range)?,
    }))
}

async fn get_scope_entry(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<ScopeEntry>, ApiError> {
    state
        .scope_store()
        .get(index)?
        .map(Json)
        .ok_or(ApiError::ScopeEntryNotFound(index))
}
