//! HTTP mapping of gate failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reconguard_core::GuardError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Errors a gated request can fail with
#[derive(Error, Debug)]
pub enum ApiError {
    /// Rejected or failed at the gate
    #[error(transparent)]
    Guard(#[from] GuardError),

    /// A recon handler ran without passing through the gate
    #[error("route is not scope-gated")]
    Ungated,
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl ApiError {
    /// Status code for this failure
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Guard(e) => e
                .status_code()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Self::Ungated => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
