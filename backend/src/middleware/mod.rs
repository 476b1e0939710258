/// Shared-secret authentication
pub mod auth;

pub use auth::auth_middleware;
