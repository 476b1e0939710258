//! Error types for image ingestion

use std::time::Duration;

use backend_storage::object_storage::StorageError;
use thiserror::Error;

use super::{codec::CodecError, source::FetchError};

/// Ingestion failure
///
/// Callers only ever see the message: every variant maps to the same client
/// error at the HTTP boundary.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Downloading the source image failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Converting the image failed
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Storing the converted image failed
    #[error("Failed to store image: {0}")]
    Storage(#[from] StorageError),

    /// The whole ingestion ran past its deadline
    #[error("Ingestion did not finish within {0:?}")]
    Timeout(Duration),
}
