mod config;
mod environment;
mod error;
mod extractors;

pub use config::{AppConfig, ConfigError, DEFAULT_LOG_BUCKET, DEFAULT_PORT};
pub use environment::Environment;
pub use error::{ApiErrorResponse, AppError};
pub use extractors::ValidatedJson;
