//! API error responses.
//!
//! Every failing handler answers with a JSON body of the form
//! `{"error": "<code>", "message": "<text>"}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shared::calculator::ValidationError;
use shared::models::AnnexureError;
use shared::storage::{ReportStoreError, ScopeStoreError};
use thiserror::Error;

/// Error body returned by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable description.
    pub message: String,
}

/// Errors raised by route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body is not valid JSON for the endpoint.
    #[error("{0}")]
    InvalidJson(String),

    /// The calculation inputs were rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A report store operation failed.
    #[error(transparent)]
    ReportStore(#[from] ReportStoreError),

    /// A scope store operation failed.
    #[error(transparent)]
    ScopeStore(#[from] ScopeStoreError),

    /// The annexure could not be built.
    #[error(transparent)]
    Annexure(#[from] AnnexureError),

    /// No scope entry exists at the given index.
    #[error("Scope entry {0} not found")]
    ScopeEntryNotFound(usize),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidJson(rejection.body_text())
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidJson(_) => (StatusCode::BAD_REQUEST, "invalid_json"),
            Self::Validation(e) => (StatusCode::BAD_REQUEST, e.code()),
            Self::ReportStore(ReportStoreError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "not_found")
            }
            Self::ReportStore(ReportStoreError::RowOutOfRange { .. }) => {
                (StatusCode::NOT_FOUND, "row_out_of_range")
            }
            Self::ReportStore(ReportStoreError::LockError) | Self::ScopeStore(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error")
            }
            Self::Annexure(AnnexureError::NoResults) => (StatusCode::BAD_REQUEST, "empty_report"),
            Self::Annexure(_) => (StatusCode::BAD_REQUEST, "validation_failed"),
            Self::ScopeEntryNotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, code, "Request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                error: code.to_string(),
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}
