//! Deferred faceclaim deletion
//!
//! Deleting a character's images one by one would tie the response time to
//! how many images they have, so removal is handed to a queue consumer. The
//! dispatcher's job ends once the broker has acknowledged the intent.

use std::sync::Arc;

use backend_storage::queue::{DeleteIntent, MessageBus, QueueResult};
use tracing::{info, instrument};

/// Publishes delete intents for faceclaim images
pub struct DeletionDispatcher {
    bus: Arc<dyn MessageBus>,
}

impl DeletionDispatcher {
    /// Creates a dispatcher publishing to `bus`
    #[must_use]
    pub fn new(bus: Arc<dyn MessageBus>) -> Self {
        Self { bus }
    }

    /// Queues deletion of `{charid}/{key}` in `bucket`
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if the intent cannot be serialized or the broker rejects it
    #[instrument(skip(self))]
    pub async fn dispatch_single(&self, bucket: &str, charid: &str, key: &str) -> QueueResult<String> {
        let intent = DeleteIntent::Single {
            bucket: bucket.to_string(),
            charid: charid.to_string(),
            key: format!("{charid}/{key}"),
        };
        self.dispatch(&intent).await
    }

    /// Queues deletion of every object under `{charid}/` in `bucket`
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if the intent cannot be serialized or the broker rejects it
    #[instrument(skip(self))]
    pub async fn dispatch_group(&self, bucket: &str, charid: &str) -> QueueResult<String> {
        let intent = DeleteIntent::Group {
            bucket: bucket.to_string(),
            charid: charid.to_string(),
        };
        self.dispatch(&intent).await
    }

    async fn dispatch(&self, intent: &DeleteIntent) -> QueueResult<String> {
        let payload = serde_json::to_string(intent)?;
        let message_id = self.bus.publish(intent.topic(), payload).await?;
        info!(message_id = %message_id, "Queued deletion of {intent:?}");
        Ok(message_id)
    }
}
