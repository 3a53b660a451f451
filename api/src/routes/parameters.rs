//! Parameter and unit catalogue endpoint.

use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use shared::models::{all_units, Parameter};

/// A parameter with the units offered for it.
#[derive(Debug, Serialize, Deserialize)]
pub struct ParameterInfo {
    /// The parameter.
    pub parameter: Parameter,
    /// Units offered for the parameter.
    pub units: Vec<String>,
}

/// Response listing every parameter and unit.
#[derive(Debug, Serialize, Deserialize)]
pub struct ParametersResponse {
    /// Parameters in display order.
    pub parameters: Vec<ParameterInfo>,
    /// Every unit, sorted and without duplicates.
    pub all_units: Vec<String>,
}

/// Creates the parameter routes.
pub fn parameter_routes() -> Router {
    Router::new().route("/api/v1/parameters", get(list_parameters))
}

async fn list_parameters() -> Json<ParametersResponse> {
    Json(ParametersResponse {
        parameters: Parameter::ALL
            .into_iter()
            .map(|parameter| ParameterInfo {
                parameter,
                units: parameter.units().iter().map(ToString::to_string).collect(),
            })
            .collect(),
        all_units: all_units().into_iter().map(ToString::to_string).collect(),
    })
}
