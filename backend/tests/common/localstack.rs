use std::sync::Arc;
use std::time::Duration;

use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_sqs::Client as SqsClient;
use axum::Router;
use backend_storage::{
    object_storage::{S3Storage, StorageGateway, DEFAULT_PUT_TIMEOUT},
    queue::{DeleteIntent, SqsMessageBus, TopicConsumer, DELETE_GROUP_TOPIC, DELETE_SINGLE_TOPIC},
};

use super::{build_router, setup_test_env, test_config, StaticImageSource, LOG_BUCKET};

/// Router wired to LocalStack S3 and SQS
pub struct LocalStackContext {
    pub router: Router,
    pub s3_client: Arc<S3Client>,
    pub sqs_client: Arc<SqsClient>,
    pub storage: Arc<S3Storage>,
}

impl LocalStackContext {
    /// Creates the buckets and delete queues, then builds the router
    pub async fn new(buckets: &[&str]) -> Self {
        setup_test_env();

        let credentials = Credentials::from_keys("test", "test", None);
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .endpoint_url("http://localhost:4566")
            .region("us-east-1")
            .credentials_provider(credentials)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();
        let s3_client = Arc::new(S3Client::from_conf(s3_config));
        let sqs_client = Arc::new(SqsClient::new(&sdk_config));

        for bucket in buckets.iter().copied().chain([LOG_BUCKET]) {
            // Already-exists errors are fine; buckets are shared between runs
            let _ = s3_client.create_bucket().bucket(bucket).send().await;
        }
        for topic in [DELETE_SINGLE_TOPIC, DELETE_GROUP_TOPIC] {
            sqs_client
                .create_queue()
                .queue_name(topic)
                .send()
                .await
                .expect("Failed to create delete queue");
        }

        let storage = Arc::new(S3Storage::new(s3_client.clone(), DEFAULT_PUT_TIMEOUT));
        let router = build_router(
            test_config(),
            Arc::new(StaticImageSource::with_fixture()),
            storage.clone(),
            Arc::new(SqsMessageBus::new(sqs_client.clone())),
        );

        Self {
            router,
            s3_client,
            sqs_client,
            storage,
        }
    }

    /// Stand-in for the external consumer: drains both delete queues once and
    /// applies every intent, tolerating objects that are already gone
    pub async fn run_delete_consumer_once(&self) {
        for topic in [DELETE_SINGLE_TOPIC, DELETE_GROUP_TOPIC] {
            let consumer: TopicConsumer<DeleteIntent> =
                TopicConsumer::connect(self.sqs_client.clone(), topic)
                    .await
                    .unwrap()
                    .with_wait_time(1);
            for message in consumer.receive().await.unwrap() {
                self.apply(&message.body).await;
                consumer.ack(&message).await.unwrap();
            }
        }
    }

    async fn apply(&self, intent: &DeleteIntent) {
        let keys = match intent {
            DeleteIntent::Single { bucket, key, .. } => vec![(bucket.clone(), key.clone())],
            DeleteIntent::Group { bucket, charid } => self
                .s3_client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(format!("{charid}/"))
                .send()
                .await
                .unwrap()
                .contents()
                .iter()
                .filter_map(|object| object.key())
                .map(|key| (bucket.clone(), key.to_string()))
                .collect(),
        };

        for (bucket, key) in keys {
            let _ = self
                .s3_client
                .delete_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await;
        }
    }

    /// Runs the consumer until every key is gone, up to `ceiling`
    pub async fn wait_for_deletion(&self, bucket: &str, keys: &[String], ceiling: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + ceiling;
        while tokio::time::Instant::now() < deadline {
            self.run_delete_consumer_once().await;

            let mut remaining = 0;
            for key in keys {
                if self.storage.object_exists(bucket, key).await.unwrap() {
                    remaining += 1;
                }
            }
            if remaining == 0 {
                return true;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
        false
    }
}
