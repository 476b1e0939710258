//! Universal error handling for the API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use backend_storage::queue::QueueError;
use serde::Serialize;

use crate::ingestion::IngestError;

/// API error response envelope
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    /// Human-readable error message
    pub error: String,
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
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            inner: ApiErrorResponse { error: msg.into() },
        }
    }

    /// 400 carrying the given message
    #[must_use]
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    /// 401 with the fixed `Unauthorized` message
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    /// 500 carrying the given message
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// HTTP status this error maps to
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Message returned to the caller
    #[must_use]
    pub fn message(&self) -> &str {
        &self.inner.error
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error based on status code
        match self.status.as_u16() {
            400..=499 => tracing::warn!("Client error: {} - {}", self.status, self.inner.error),
            500..=599 => tracing::error!("Server error: {} - {}", self.status, self.inner.error),
            _ => {}
        }

        (self.status, Json(self.inner)).into_response()
    }
}

/// Fetch, codec and storage failures all surface as client errors
impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match &err {
            IngestError::Fetch(_) => tracing::debug!("Ingestion failed fetching source: {err}"),
            IngestError::Codec(_) => tracing::debug!("Ingestion failed converting image: {err}"),
            IngestError::Storage(_) => tracing::error!("Ingestion failed storing image: {err}"),
            IngestError::Timeout(_) => tracing::error!("Ingestion timed out: {err}"),
        }
        Self::bad_request(err.to_string())
    }
}

/// Convert message bus errors to application errors
impl From<QueueError> for AppError {
    fn from(err: QueueError) -> Self {
        if err.is_upstream_error() {
            tracing::error!("Message bus upstream error: {err}");
        }
        Self::internal(err.to_string())
    }
}
