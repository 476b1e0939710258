use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use backend_storage::{
    object_storage::StorageGateway,
    queue::MessageBus,
    testing::{InMemoryMessageBus, InMemoryStorage},
};
use faceclaim_api::{
    deletion::DeletionDispatcher,
    ingestion::{ImageIngestionPipeline, ImageSource, WebpCodec},
    server,
    types::{AppConfig, Environment},
};
use tower::ServiceExt;

use super::StaticImageSource;

pub const TEST_TOKEN: &str = "test-token";
pub const DEFAULT_BUCKET: &str = "pcs.inconnu.app";
pub const OVERRIDE_BUCKET: &str = "pcs.botch.lol";
pub const LOG_BUCKET: &str = "inconnu-logs";

/// Setup test environment variables and logging
pub fn setup_test_env() {
    // Load test environment variables
    dotenvy::from_path(".env.example").ok();

    // Initialize tracing for tests
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

pub fn test_config() -> AppConfig {
    AppConfig {
        environment: Environment::Development,
        api_token: TEST_TOKEN.to_string(),
        faceclaim_bucket: DEFAULT_BUCKET.to_string(),
        log_bucket: LOG_BUCKET.to_string(),
        port: 0,
    }
}

/// Build the real router over arbitrary collaborators
pub fn build_router(
    config: AppConfig,
    source: Arc<dyn ImageSource>,
    storage: Arc<dyn StorageGateway>,
    bus: Arc<dyn MessageBus>,
) -> Router {
    let pipeline = Arc::new(ImageIngestionPipeline::new(
        source,
        Arc::new(WebpCodec::default()),
        storage.clone(),
        config.faceclaim_bucket.clone(),
    ));
    let dispatcher = Arc::new(DeletionDispatcher::new(bus));

    server::router(Arc::new(config), pipeline, dispatcher, storage)
}

/// Router over in-memory storage and message bus
pub struct TestContext {
    pub router: Router,
    pub storage: Arc<InMemoryStorage>,
    pub bus: Arc<InMemoryMessageBus>,
}

impl TestContext {
    pub fn new() -> Self {
        setup_test_env();

        let storage = Arc::new(InMemoryStorage::new());
        let bus = Arc::new(InMemoryMessageBus::new());
        let router = build_router(
            test_config(),
            Arc::new(StaticImageSource::with_fixture()),
            storage.clone(),
            bus.clone(),
        );

        Self {
            router,
            storage,
            bus,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// POST a JSON body with the valid token
    pub async fn send_post_request(&self, route: &str, payload: serde_json::Value) -> Response {
        let request = Request::builder()
            .uri(route)
            .method(Method::POST)
            .header(header::AUTHORIZATION, TEST_TOKEN)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// DELETE with the valid token
    pub async fn send_delete_request(&self, route: &str) -> Response {
        let request = Request::builder()
            .uri(route)
            .method(Method::DELETE)
            .header(header::AUTHORIZATION, TEST_TOKEN)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// POST a multipart body with the valid token
    pub async fn send_multipart_request(
        &self,
        route: &str,
        content_type: String,
        body: Vec<u8>,
    ) -> Response {
        let request = Request::builder()
            .uri(route)
            .method(Method::POST)
            .header(header::AUTHORIZATION, TEST_TOKEN)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }
}
