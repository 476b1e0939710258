//! Backend storage services for the faceclaim API
//!
//! This crate provides the external-service seams shared between the API and
//! whatever consumes its deletion queues: object storage (S3) and the message
//! bus (SQS), along with the delete-intent envelope both sides agree on.

pub mod object_storage;
pub mod queue;

/// In-memory fakes for the storage and queue traits
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
