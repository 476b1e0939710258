use std::sync::Arc;

use axum::{
    extract::multipart::{Multipart, MultipartError, MultipartRejection},
    http::StatusCode,
    Extension, Json,
};
use backend_storage::object_storage::{ObjectMetadata, StorageError, StorageGateway};
use thiserror::Error;
use tracing::{info, instrument};

use crate::types::{AppConfig, AppError};

/// Multipart field carrying the log file
pub const LOG_FILE_FIELD: &str = "log_file";

/// Errors from `POST /log/upload`
#[derive(Error, Debug)]
pub enum LogUploadError {
    /// The request is not a readable multipart form
    #[error("{0}")]
    InvalidForm(String),

    /// No `log_file` part was sent
    #[error("no file provided in the {LOG_FILE_FIELD} field")]
    MissingFile,

    /// The `log_file` part has no file name
    #[error("the {LOG_FILE_FIELD} field has no file name")]
    MissingFileName,

    /// Storing the file failed
    #[error("Failed to store log file: {0}")]
    Storage(#[from] StorageError),
}

impl From<MultipartRejection> for LogUploadError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::InvalidForm(rejection.body_text())
    }
}

impl From<MultipartError> for LogUploadError {
    fn from(err: MultipartError) -> Self {
        Self::InvalidForm(err.body_text())
    }
}

impl From<LogUploadError> for AppError {
    fn from(err: LogUploadError) -> Self {
        match err {
            LogUploadError::Storage(_) => Self::internal(err.to_string()),
            _ => Self::bad_request(err.to_string()),
        }
    }
}

/// Stores an uploaded log file in the log bucket under its own file name
///
/// An existing object with the same name is overwritten.
///
/// # Errors
///
/// - 400 if the form is unreadable or has no named `log_file` part
/// - 500 if the file cannot be stored
#[instrument(skip_all)]
pub async fn upload(
    Extension(config): Extension<Arc<AppConfig>>,
    Extension(storage): Extension<Arc<dyn StorageGateway>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<String>), AppError> {
    let mut multipart = multipart.map_err(LogUploadError::from)?;

    let (file_name, contents) = read_log_file(&mut multipart).await?;

    storage
        .put_object(
            &config.log_bucket,
            &file_name,
            contents,
            mime::TEXT_PLAIN.as_ref(),
            ObjectMetadata::new(),
        )
        .await
        .map_err(LogUploadError::from)?;

    info!("{file_name} uploaded to {}", config.log_bucket);
    Ok((StatusCode::CREATED, Json(format!("Uploaded {file_name}"))))
}

async fn read_log_file(multipart: &mut Multipart) -> Result<(String, Vec<u8>), LogUploadError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(LOG_FILE_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(ToString::to_string)
            .ok_or(LogUploadError::MissingFileName)?;
        let contents = field.bytes().await?;

        return Ok((file_name, contents.to_vec()));
    }

    Err(LogUploadError::MissingFile)
}
