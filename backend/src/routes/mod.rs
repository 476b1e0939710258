/// Faceclaim upload and deletion
pub mod faceclaim;
/// Log file archival
pub mod logs;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, post},
    Router,
};

use crate::middleware::auth_middleware;

/// Largest accepted log upload
pub const MAX_LOG_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Creates the router with all handler routes, every one behind the auth middleware
pub fn handler() -> Router {
    Router::new()
        .route("/faceclaim/upload", post(faceclaim::upload))
        .route(
            "/faceclaim/delete/{bucket}/{charid}/all",
            delete(faceclaim::delete_group),
        )
        .route(
            "/faceclaim/delete/{bucket}/{charid}/{key}",
            delete(faceclaim::delete_single),
        )
        .route(
            "/log/upload",
            post(logs::upload).layer(DefaultBodyLimit::max(MAX_LOG_UPLOAD_BYTES)),
        )
        .layer(middleware::from_fn(auth_middleware))
}
