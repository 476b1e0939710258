use std::sync::Arc;
use std::time::Duration;

use aws_sdk_s3::Client as S3Client;
use aws_sdk_sqs::Client as SqsClient;
use backend_storage::{
    object_storage::{S3Storage, StorageGateway, DEFAULT_PUT_TIMEOUT},
    queue::SqsMessageBus,
};
use faceclaim_api::{
    deletion::DeletionDispatcher,
    ingestion::{HttpImageSource, ImageIngestionPipeline, WebpCodec},
    server,
    types::AppConfig,
};
use tracing_subscriber::{fmt, EnvFilter};

/// Deadline for downloading a source image
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing required settings end the process here, before anything binds
    let config = Arc::new(AppConfig::from_env()?);

    // Use JSON format for staging/production, regular format for development
    if config.environment.json_logs() {
        fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    } else {
        fmt().with_env_filter(EnvFilter::from_default_env()).init();
    }

    tracing::info!(
        "Starting in {:?} with default bucket {}",
        config.environment,
        config.faceclaim_bucket
    );

    let aws_config = config.environment.aws_config().await;
    let s3_client = Arc::new(S3Client::from_conf(config.environment.s3_client_config().await));
    let sqs_client = Arc::new(SqsClient::new(&aws_config));

    let storage: Arc<dyn StorageGateway> = Arc::new(S3Storage::new(s3_client, DEFAULT_PUT_TIMEOUT));
    let http_client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;

    let pipeline = Arc::new(ImageIngestionPipeline::new(
        Arc::new(HttpImageSource::new(http_client)),
        Arc::new(WebpCodec::default()),
        storage.clone(),
        config.faceclaim_bucket.clone(),
    ));
    let dispatcher = Arc::new(DeletionDispatcher::new(Arc::new(SqsMessageBus::new(
        sqs_client,
    ))));

    server::start(config, pipeline, dispatcher, storage).await
}
