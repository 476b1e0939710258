//! Queue operations for the faceclaim API
//!
//! Deletions are not performed in-process. The API publishes a
//! [`DeleteIntent`] to an SQS queue and returns once the broker has accepted
//! it; a separate consumer drains the queue and removes the objects.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Error types for queue operations
pub mod error;
/// Topic-addressed publishing
pub mod message_bus;
/// Consumer side of a topic, for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod consumer;
/// Common types for queue operations
pub mod types;

pub use error::{QueueError, QueueResult};
pub use message_bus::{MessageBus, SqsMessageBus};
#[cfg(any(test, feature = "test-utils"))]
pub use consumer::{ReceivedMessage, TopicConsumer};
pub use types::{DeleteIntent, DELETE_GROUP_TOPIC, DELETE_SINGLE_TOPIC};
