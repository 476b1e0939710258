//! Error types for object storage operations

use std::time::Duration;

use aws_sdk_s3::{
    error::{DisplayErrorContext, SdkError},
    operation::{head_object::HeadObjectError, put_object::PutObjectError},
};
use thiserror::Error;

/// Result type for object storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during object storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// S3 service error
    #[error("S3 service error: {0}")]
    S3Error(String),

    /// AWS SDK error (transport, dispatch, response parsing)
    #[error("AWS SDK error: {0}")]
    AwsError(String),

    /// Upstream service error (5xx from S3)
    #[error("Upstream service error: {0}")]
    UpstreamError(String),

    /// The operation did not finish before its deadline
    #[error("Timed out after {}s writing {bucket}/{key}", .timeout.as_secs())]
    Timeout {
        /// Target bucket
        bucket: String,
        /// Target key
        key: String,
        /// The deadline that elapsed
        timeout: Duration,
    },
}

impl From<SdkError<PutObjectError>> for StorageError {
    fn from(error: SdkError<PutObjectError>) -> Self {
        match &error {
            SdkError::ServiceError(err) if err.raw().status().as_u16() >= 500 => {
                Self::UpstreamError(DisplayErrorContext(&error).to_string())
            }
            SdkError::ServiceError(_) => Self::S3Error(DisplayErrorContext(&error).to_string()),
            _ => Self::AwsError(DisplayErrorContext(&error).to_string()),
        }
    }
}

impl From<SdkError<HeadObjectError>> for StorageError {
    fn from(error: SdkError<HeadObjectError>) -> Self {
        match &error {
            SdkError::ServiceError(err) if err.raw().status().as_u16() >= 500 => {
                Self::UpstreamError(DisplayErrorContext(&error).to_string())
            }
            SdkError::ServiceError(err) => Self::S3Error(format!("{:?}", err.err())),
            _ => Self::AwsError(DisplayErrorContext(&error).to_string()),
        }
    }
}
