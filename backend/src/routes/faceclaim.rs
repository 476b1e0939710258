use std::sync::Arc;

use axum::{extract::Path, http::StatusCode, Extension, Json};
use tracing::instrument;

use crate::{
    deletion::DeletionDispatcher,
    ingestion::{ImageIngestionPipeline, IngestionRequest},
    types::{AppError, ValidatedJson},
};

/// Downloads the requested image, converts it to WebP and stores it
///
/// Responds 201 with the public URL of the new object.
///
/// # Errors
///
/// - 400 for a missing, malformed or invalid body
/// - 400 if fetching, converting or storing the image fails
#[instrument(skip(pipeline, payload))]
pub async fn upload(
    Extension(pipeline): Extension<Arc<ImageIngestionPipeline>>,
    ValidatedJson(payload): ValidatedJson<IngestionRequest>,
) -> Result<(StatusCode, Json<String>), AppError> {
    let url = pipeline.ingest(&payload).await?;
    Ok((StatusCode::CREATED, Json(url)))
}

/// Queues deletion of all of a character's faceclaim images
///
/// The response only confirms the intent was queued; the images disappear
/// once the consumer gets to it.
///
/// # Errors
///
/// - 500 if the delete intent cannot be published
#[instrument(skip(dispatcher))]
pub async fn delete_group(
    Extension(dispatcher): Extension<Arc<DeletionDispatcher>>,
    Path((bucket, charid)): Path<(String, String)>,
) -> Result<Json<String>, AppError> {
    dispatcher.dispatch_group(&bucket, &charid).await?;
    Ok(Json(format!("Deleted {charid}'s faceclaim images")))
}

/// Queues deletion of a single faceclaim image
///
/// Goes through the queue like group deletion so both share one mechanism.
///
/// # Errors
///
/// - 500 if the delete intent cannot be published
#[instrument(skip(dispatcher))]
pub async fn delete_single(
    Extension(dispatcher): Extension<Arc<DeletionDispatcher>>,
    Path((bucket, charid, key)): Path<(String, String, String)>,
) -> Result<Json<String>, AppError> {
    dispatcher.dispatch_single(&bucket, &charid, &key).await?;
    Ok(Json(format!("Deleted {charid}/{key}")))
}
