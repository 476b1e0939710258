//! Test-side consumer for delete-intent topics
//!
//! The production consumer lives outside this service. This one drains a
//! topic so LocalStack tests can play the consumer's part.

use std::marker::PhantomData;
use std::sync::Arc;

use aws_sdk_sqs::Client as SqsClient;
use serde::de::DeserializeOwned;

use crate::queue::{error::QueueResult, message_bus::resolve_queue_url};

/// Most messages SQS hands out per receive call
const MAX_BATCH: i32 = 10;

/// A decoded message still awaiting acknowledgment
#[derive(Debug, Clone)]
pub struct ReceivedMessage<T> {
    /// Broker-assigned message ID, as returned by the publisher
    pub message_id: String,
    /// Decoded payload
    pub body: T,
    receipt_handle: String,
}

/// Reads typed messages from the queue behind a topic
pub struct TopicConsumer<T> {
    sqs_client: Arc<SqsClient>,
    queue_url: String,
    wait_time_seconds: i32,
    _payload: PhantomData<T>,
}

impl<T: DeserializeOwned> TopicConsumer<T> {
    /// Resolves `topic` to its queue and returns a consumer that does not long-poll
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if no queue exists for `topic`
    pub async fn connect(sqs_client: Arc<SqsClient>, topic: &str) -> QueueResult<Self> {
        let queue_url = resolve_queue_url(&sqs_client, topic).await?;
        Ok(Self {
            sqs_client,
            queue_url,
            wait_time_seconds: 0,
            _payload: PhantomData,
        })
    }

    /// Long-polls each receive for up to `seconds`
    #[must_use]
    pub const fn with_wait_time(mut self, seconds: i32) -> Self {
        self.wait_time_seconds = seconds;
        self
    }

    /// Receives up to ten messages
    ///
    /// Received messages stay invisible to other receivers until acked or
    /// until the queue's visibility timeout runs out.
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if the receive fails or a body is not a valid `T`
    pub async fn receive(&self) -> QueueResult<Vec<ReceivedMessage<T>>> {
        let output = self
            .sqs_client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(MAX_BATCH)
            .wait_time_seconds(self.wait_time_seconds)
            .send()
            .await?;

        let mut received = Vec::new();
        for message in output.messages() {
            let (Some(message_id), Some(body), Some(receipt_handle)) =
                (message.message_id(), message.body(), message.receipt_handle())
            else {
                continue;
            };
            received.push(ReceivedMessage {
                message_id: message_id.to_string(),
                body: serde_json::from_str(body)?,
                receipt_handle: receipt_handle.to_string(),
            });
        }
        Ok(received)
    }

    /// Removes a handled message from the queue
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if SQS rejects the delete
    pub async fn ack(&self, message: &ReceivedMessage<T>) -> QueueResult<()> {
        self.sqs_client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(&message.receipt_handle)
            .send()
            .await?;
        Ok(())
    }
}
