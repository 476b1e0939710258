use std::sync::Arc;

use axum::{
    extract::Request,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Extension,
};

use crate::types::{AppConfig, AppError};

/// Shared-secret authentication middleware
///
/// The `Authorization` header must equal the configured API token exactly.
/// A missing or different header yields 401 before any handler or body
/// extractor runs.
///
/// # Errors
///
/// - `AppError` - Missing or mismatched token with 401 status code
pub async fn auth_middleware(
    Extension(config): Extension<Arc<AppConfig>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .is_some_and(|token| token == config.api_token);

    if !authorized {
        return Err(AppError::unauthorized());
    }

    Ok(next.run(request).await)
}
