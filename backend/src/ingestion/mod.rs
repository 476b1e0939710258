//! Faceclaim ingestion: fetch, convert, name, store
//!
//! The pipeline downloads a remote image, re-encodes it as WebP and stores it
//! under `{charid}/{random id}.webp` in the resolved bucket. The returned URL
//! is derived from the bucket name, which is expected to be served as a
//! public host of the same name.

mod codec;
mod error;
mod naming;
mod source;

use std::sync::Arc;
use std::time::Duration;

use backend_storage::object_storage::{ObjectMetadata, StorageGateway};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::{Validate, ValidationError};

pub use codec::{CodecError, ImageCodec, WebpCodec, WEBP_QUALITY};
pub use error::IngestError;
pub use naming::{ObjectNamer, StoredObjectKey};
pub use source::{FetchError, HttpImageSource, ImageSource};

/// Deadline for one ingestion, fetch through store
///
/// Kept below the server's request timeout so a slow upload still gets a
/// JSON error body.
pub const INGEST_TIMEOUT: Duration = Duration::from_secs(55);

/// Body of `POST /faceclaim/upload`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct IngestionRequest {
    /// Guild the character belongs to
    pub guild: i64,
    /// User who owns the character
    pub user: i64,
    /// Character ID; becomes the key prefix
    #[validate(
        length(min = 1, message = "charid must not be empty"),
        custom(function = "validate_charid")
    )]
    pub charid: String,
    /// Source image location
    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: String,
    /// Bucket override; empty or absent means the configured default
    #[serde(default)]
    pub bucket: Option<String>,
}

impl IngestionRequest {
    /// Metadata attached to the stored object
    #[must_use]
    pub fn metadata(&self) -> ObjectMetadata {
        ObjectMetadata::from([
            ("guild".to_string(), self.guild.to_string()),
            ("user".to_string(), self.user.to_string()),
            ("original".to_string(), self.image_url.clone()),
            ("charid".to_string(), self.charid.clone()),
        ])
    }
}

/// Keys are `{charid}/{id}`, so a charid must be a single path segment
fn validate_charid(charid: &str) -> Result<(), ValidationError> {
    if charid.contains('/') {
        return Err(ValidationError::new("charid")
            .with_message("charid must not contain '/'".into()));
    }
    Ok(())
}

/// Public URL of a stored object
#[must_use]
pub fn public_url(bucket: &str, key: &StoredObjectKey) -> String {
    format!("https://{bucket}/{key}")
}

/// Fetches, converts and stores faceclaim images
pub struct ImageIngestionPipeline {
    source: Arc<dyn ImageSource>,
    codec: Arc<dyn ImageCodec>,
    storage: Arc<dyn StorageGateway>,
    namer: ObjectNamer,
    default_bucket: String,
    deadline: Duration,
}

impl ImageIngestionPipeline {
    /// Creates a new pipeline
    ///
    /// # Arguments
    ///
    /// * `source` - Where source images are downloaded from
    /// * `codec` - Target format; also decides the key extension and content type
    /// * `storage` - Where converted images are written
    /// * `default_bucket` - Bucket used when a request names none
    #[must_use]
    pub fn new(
        source: Arc<dyn ImageSource>,
        codec: Arc<dyn ImageCodec>,
        storage: Arc<dyn StorageGateway>,
        default_bucket: String,
    ) -> Self {
        let namer = ObjectNamer::new(codec.extension());
        Self {
            source,
            codec,
            storage,
            namer,
            default_bucket,
            deadline: INGEST_TIMEOUT,
        }
    }

    /// Replaces the default [`INGEST_TIMEOUT`]
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Picks the requested bucket if non-empty, else the default
    #[must_use]
    pub fn resolve_bucket<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        match requested {
            Some(bucket) if !bucket.is_empty() => bucket,
            _ => &self.default_bucket,
        }
    }

    /// Runs one ingestion and returns the stored object's public URL
    ///
    /// Each call stores a new object, even for identical requests.
    ///
    /// # Errors
    ///
    /// Returns `IngestError` if the download, the conversion or the store
    /// fails, or if all of it takes longer than the pipeline's deadline
    #[instrument(skip(self, request), fields(charid = %request.charid))]
    pub async fn ingest(&self, request: &IngestionRequest) -> Result<String, IngestError> {
        tokio::time::timeout(self.deadline, self.run(request))
            .await
            .map_err(|_| IngestError::Timeout(self.deadline))?
    }

    async fn run(&self, request: &IngestionRequest) -> Result<String, IngestError> {
        let original = self.source.fetch(&request.image_url).await?;
        info!(
            "File downloaded ({} bytes); converting to {}",
            original.len(),
            self.codec.extension()
        );

        let codec = Arc::clone(&self.codec);
        let converted = tokio::task::spawn_blocking(move || codec.encode(&original))
            .await
            .map_err(|e| CodecError::Encode(format!("conversion task failed: {e}")))??;
        info!("File converted ({} bytes)", converted.len());

        let bucket = self.resolve_bucket(request.bucket.as_deref());
        let key = self.namer.name(&request.charid);

        self.storage
            .put_object(
                bucket,
                &key.to_string(),
                converted,
                self.codec.content_type(),
                request.metadata(),
            )
            .await?;

        Ok(public_url(bucket, &key))
    }
}
