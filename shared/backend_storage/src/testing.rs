//! In-memory stand-ins for [`StorageGateway`] and [`MessageBus`]
//!
//! Both record every call so tests can assert on side effects, and both can
//! be switched into a failing mode.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::object_storage::{ObjectMetadata, StorageError, StorageGateway, StorageResult};
use crate::queue::{QueueError, QueueResult};
use crate::queue::MessageBus;

/// An object held by [`InMemoryStorage`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object bytes
    pub body: Vec<u8>,
    /// Content type given at upload
    pub content_type: String,
    /// Metadata given at upload
    pub metadata: ObjectMetadata,
}

/// Object store keyed by `(bucket, key)`
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    fail_puts: AtomicBool,
}

impl InMemoryStorage {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `put_object` fail
    pub fn fail_puts(&self) {
        self.fail_puts.store(true, Ordering::SeqCst);
    }

    /// Returns the object at `bucket/key`, if any
    pub async fn get(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Number of stored objects across all buckets
    pub async fn len(&self) -> usize {
        self.objects.lock().await.len()
    }

    /// Whether nothing has been stored
    pub async fn is_empty(&self) -> bool {
        self.objects.lock().await.is_empty()
    }

    /// Keys stored in `bucket` under `prefix`
    pub async fn keys_with_prefix(&self, bucket: &str, prefix: &str) -> Vec<String> {
        self.objects
            .lock()
            .await
            .keys()
            .filter(|(b, k)| b == bucket && k.starts_with(prefix))
            .map(|(_, k)| k.clone())
            .collect()
    }
}

#[async_trait]
impl StorageGateway for InMemoryStorage {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        metadata: ObjectMetadata,
    ) -> StorageResult<()> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::UpstreamError(format!(
                "refusing write to {bucket}/{key}"
            )));
        }

        self.objects.lock().await.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: content_type.to_string(),
                metadata,
            },
        );
        Ok(())
    }

    async fn object_exists(&self, bucket: &str, key: &str) -> StorageResult<bool> {
        Ok(self.get(bucket, key).await.is_some())
    }
}

/// A message accepted by [`InMemoryMessageBus`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    /// Topic the message was published to
    pub topic: String,
    /// Raw payload
    pub payload: String,
    /// ID returned to the publisher
    pub message_id: String,
}

/// Message bus that acknowledges by appending to a list
#[derive(Debug, Default)]
pub struct InMemoryMessageBus {
    published: Mutex<Vec<PublishedMessage>>,
    reject: AtomicBool,
}

impl InMemoryMessageBus {
    /// Creates an empty bus
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `publish` fail as an upstream error
    pub fn reject_publishes(&self) {
        self.reject.store(true, Ordering::SeqCst);
    }

    /// Messages accepted so far, in publish order
    pub async fn published(&self) -> Vec<PublishedMessage> {
        self.published.lock().await.clone()
    }
}

#[async_trait]
impl MessageBus for InMemoryMessageBus {
    async fn publish(&self, topic: &str, payload: String) -> QueueResult<String> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(QueueError::UpstreamError);
        }

        let mut published = self.published.lock().await;
        let message_id = format!("msg-{}", published.len() + 1);
        published.push(PublishedMessage {
            topic: topic.to_string(),
            payload,
            message_id: message_id.clone(),
        });
        Ok(message_id)
    }
}
