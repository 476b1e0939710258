//! Service settings read once at startup

use std::env;

use thiserror::Error;

use super::Environment;

/// Port used when `PORT` is unset
pub const DEFAULT_PORT: u16 = 8080;

/// Bucket for uploaded log files when `LOG_BUCKET` is unset
pub const DEFAULT_LOG_BUCKET: &str = "inconnu-logs";

/// Startup configuration problems; the service never begins serving with one
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is absent
    #[error("{0} is not set!")]
    MissingVar(&'static str),

    /// `PORT` is not a valid port number
    #[error("PORT is not a valid port: {0}")]
    InvalidPort(String),

    /// `APP_ENV` names an unknown environment
    #[error("Invalid environment: {0}")]
    InvalidEnvironment(String),
}

/// Immutable service configuration
///
/// Built once in `main` and shared with handlers as an axum `Extension`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Deployment stage
    pub environment: Environment,
    /// Secret every request's `Authorization` header must equal
    pub api_token: String,
    /// Bucket for faceclaims when the request names none
    pub faceclaim_bucket: String,
    /// Bucket for uploaded log files
    pub log_bucket: String,
    /// Listen port
    pub port: u16,
}

impl AppConfig {
    /// Reads the configuration from the process environment
    ///
    /// `API_TOKEN` and `FACECLAIM_BUCKET` are required. Only their presence is
    /// checked, so an empty `API_TOKEN` is accepted.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value is malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env()?;

        let port = match env::var("PORT") {
            Ok(port) => port
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(port))?,
            Err(_) => DEFAULT_PORT,
        };

        let api_token = env::var("API_TOKEN").map_err(|_| ConfigError::MissingVar("API_TOKEN"))?;
        let faceclaim_bucket =
            env::var("FACECLAIM_BUCKET").map_err(|_| ConfigError::MissingVar("FACECLAIM_BUCKET"))?;
        let log_bucket = env::var("LOG_BUCKET").unwrap_or_else(|_| DEFAULT_LOG_BUCKET.to_string());

        Ok(Self {
            environment,
            api_token,
            faceclaim_bucket,
            log_bucket,
            port,
        })
    }
}
