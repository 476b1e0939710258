//! Topic-addressed publishing over SQS
//!
//! Each topic is a standard SQS queue whose name equals the topic. Publishing
//! completes once SQS has accepted the message and returned its ID; nothing
//! here observes what the consumer later does with it.

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_sqs::{operation::send_message::SendMessageOutput, Client as SqsClient};
use tracing::{debug, info};

use crate::queue::error::{QueueError, QueueResult};

/// Publishes payloads to named topics
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Publishes `payload` to `topic` and waits for the broker's acknowledgment
    ///
    /// # Returns
    ///
    /// The broker-assigned message ID
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if the broker rejects the message or cannot be reached
    async fn publish(&self, topic: &str, payload: String) -> QueueResult<String>;
}

/// Message bus backed by SQS queues named after their topics
pub struct SqsMessageBus {
    sqs_client: Arc<SqsClient>,
}

impl SqsMessageBus {
    /// Creates a new SQS message bus
    ///
    /// # Arguments
    ///
    /// * `sqs_client` - Pre-configured SQS client
    #[must_use]
    pub const fn new(sqs_client: Arc<SqsClient>) -> Self {
        Self { sqs_client }
    }
}

/// Looks up the URL of the queue named `topic`
pub(crate) async fn resolve_queue_url(sqs_client: &SqsClient, topic: &str) -> QueueResult<String> {
    let result = sqs_client.get_queue_url().queue_name(topic).send().await?;

    result
        .queue_url()
        .map(ToString::to_string)
        .ok_or_else(|| QueueError::UnknownTopic(topic.to_string()))
}

/// The broker's acknowledgment is its message ID; a reply without one is not an ack
fn acknowledged_id(topic: &str, output: &SendMessageOutput) -> QueueResult<String> {
    output
        .message_id()
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| QueueError::MissingMessageId(topic.to_string()))
}

#[async_trait]
impl MessageBus for SqsMessageBus {
    async fn publish(&self, topic: &str, payload: String) -> QueueResult<String> {
        let queue_url = resolve_queue_url(&self.sqs_client, topic).await?;
        debug!("Publishing to {queue_url}: {payload}");

        let result = self
            .sqs_client
            .send_message()
            .queue_url(&queue_url)
            .message_body(payload)
            .send()
            .await?;

        let message_id = acknowledged_id(topic, &result)?;
        info!(topic, message_id = %message_id, "Message accepted by broker");

        Ok(message_id)
    }
}
