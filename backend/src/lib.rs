//! Faceclaim API service
//!
//! Converts remote images to WebP and stores them per character, queues
//! their deletion for an out-of-process consumer, and archives log uploads.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

/// Delete-intent publishing
pub mod deletion;

/// Image fetch, conversion and storage
pub mod ingestion;

/// Request middleware
pub mod middleware;

/// HTTP handlers
pub mod routes;

/// Router assembly and serving
pub mod server;

/// Configuration and error types
pub mod types;
