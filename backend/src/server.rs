use std::sync::Arc;
use std::time::Duration;

use axum::{Extension, Router};
use backend_storage::object_storage::StorageGateway;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::routes;
use crate::{deletion::DeletionDispatcher, ingestion::ImageIngestionPipeline, types::AppConfig};

/// Upper bound on handling one request; above [`INGEST_TIMEOUT`](crate::ingestion::INGEST_TIMEOUT)
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Builds the application router with its dependencies attached
pub fn router(
    config: Arc<AppConfig>,
    pipeline: Arc<ImageIngestionPipeline>,
    dispatcher: Arc<DeletionDispatcher>,
    storage: Arc<dyn StorageGateway>,
) -> Router {
    routes::handler()
        .layer(Extension(config))
        .layer(Extension(pipeline))
        .layer(Extension(dispatcher))
        .layer(Extension(storage))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
}

/// Starts the server with the given configuration and dependencies
///
/// # Errors
///
/// Returns an error if the server fails to bind to the port or stops abnormally
pub async fn start(
    config: Arc<AppConfig>,
    pipeline: Arc<ImageIngestionPipeline>,
    dispatcher: Arc<DeletionDispatcher>,
    storage: Arc<dyn StorageGateway>,
) -> anyhow::Result<()> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let router = router(config, pipeline, dispatcher, storage);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🔄 Faceclaim API started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)
}

/// Resolves on Ctrl-C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
