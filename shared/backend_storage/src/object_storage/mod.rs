//! S3-based object storage operations
mod error;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::{
    error::SdkError, operation::head_object::HeadObjectError, primitives::ByteStream,
    Client as S3Client,
};
use tracing::{debug, info};

pub use error::{StorageError, StorageResult};

/// Descriptive key/value pairs attached to a stored object
pub type ObjectMetadata = HashMap<String, String>;

/// Deadline applied to a single object write
pub const DEFAULT_PUT_TIMEOUT: Duration = Duration::from_secs(50);

/// Write access to a bucketed object store
///
/// A successful `put_object` means the object is readable under `bucket/key`
/// by the time the call returns. Implementations do not retry on their own.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Stores `body` at `bucket/key` with the given content type and metadata
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the write or the deadline elapses
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        metadata: ObjectMetadata,
    ) -> StorageResult<()>;

    /// Checks whether an object exists at `bucket/key`
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot answer
    async fn object_exists(&self, bucket: &str, key: &str) -> StorageResult<bool>;
}

/// Object storage backed by S3
pub struct S3Storage {
    s3_client: Arc<S3Client>,
    put_timeout: Duration,
}

impl S3Storage {
    /// Creates a new S3 storage gateway
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `put_timeout` - Deadline for each object write
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>, put_timeout: Duration) -> Self {
        Self {
            s3_client,
            put_timeout,
        }
    }
}

#[async_trait]
impl StorageGateway for S3Storage {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        metadata: ObjectMetadata,
    ) -> StorageResult<()> {
        let size = body.len();
        let request = self
            .s3_client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .set_metadata(Some(metadata))
            .body(ByteStream::from(body))
            .send();

        tokio::time::timeout(self.put_timeout, request)
            .await
            .map_err(|_| StorageError::Timeout {
                bucket: bucket.to_string(),
                key: key.to_string(),
                timeout: self.put_timeout,
            })??;

        info!("{key} ({size} bytes) uploaded to {bucket}");
        Ok(())
    }

    #[allow(clippy::cognitive_complexity)]
    async fn object_exists(&self, bucket: &str, key: &str) -> StorageResult<bool> {
        let result = self
            .s3_client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(service_err))
                if matches!(service_err.err(), HeadObjectError::NotFound(_)) =>
            {
                debug!("Object does not exist: {bucket}/{key}");
                Ok(false)
            }
            Err(e) => Err(StorageError::from(e)),
        }
    }
}
