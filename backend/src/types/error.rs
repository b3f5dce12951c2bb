//! Universal error handling for the API

use aide::OperationOutput;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use backend_storage::trip::TripStorageError;
use schemars::JsonSchema;
use serde::Serialize;

use crate::media_storage::BucketError;

/// Message returned for every 5xx; details only go to the logs
const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal Server Error";

/// API error response body
#[derive(Debug, Serialize, JsonSchema)]
pub struct ApiErrorResponse {
    /// Machine-readable error code
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
}

/// Application error type that wraps the API error response
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    inner: ApiErrorResponse,
}

impl AppError {
    /// Create a new application error
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            inner: ApiErrorResponse {
                code,
                message: message.into(),
            },
        }
    }

    /// `400 BAD_REQUEST` for missing or invalid client input
    #[must_use]
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    /// `404 NOT_FOUND` for a trip that does not exist
    #[must_use]
    pub fn trip_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "trip_not_found", "Trip not found")
    }

    /// `500 INTERNAL_SERVER_ERROR` with the generic message
    #[must_use]
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            INTERNAL_SERVER_ERROR_MESSAGE,
        )
    }

    /// HTTP status of this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.status.as_u16() {
            400..=499 => tracing::warn!(
                "Client error: {} - {}",
                self.inner.code,
                self.inner.message
            ),
            500..=599 => tracing::error!(
                "Server error: {} - {}",
                self.inner.code,
                self.inner.message
            ),
            _ => {}
        }

        (self.status, Json(self.inner)).into_response()
    }
}

/// Convert trip storage errors to application errors
impl From<TripStorageError> for AppError {
    fn from(err: TripStorageError) -> Self {
        match err {
            TripStorageError::TripNotFound => Self::trip_not_found(),
            err => {
                tracing::error!("Trip storage error: {err}");
                Self::internal()
            }
        }
    }
}

/// Convert bucket errors to application errors
impl From<BucketError> for AppError {
    fn from(err: BucketError) -> Self {
        match err {
            BucketError::InvalidKey(err) => {
                tracing::warn!("Invalid object key: {err}");
                Self::bad_request("invalid_input", err.to_string())
            }
            err => {
                tracing::error!("S3 error: {err}");
                Self::internal()
            }
        }
    }
}

impl OperationOutput for AppError {
    type Inner = ApiErrorResponse;

    fn operation_response(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Option<aide::openapi::Response> {
        Json::<ApiErrorResponse>::operation_response(ctx, operation)
    }
}
