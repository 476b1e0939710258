//! Custom extractors for request validation

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use validator::Validate;

use crate::types::error::AppError;

/// Custom JSON extractor that validates the payload
///
/// Every rejection is a 400 whose message comes from the failing step, so an
/// empty or malformed body never reaches the handler.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: serde::de::DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // First extract JSON
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|err: JsonRejection| AppError::bad_request(err.body_text()))?;

        // Then validate
        payload
            .validate()
            .map_err(|errors| AppError::bad_request(errors.to_string()))?;

        Ok(Self(payload))
    }
}
