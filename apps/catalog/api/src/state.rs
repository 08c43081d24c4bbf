//! Shared application state.

use axum_helpers::JwtAuth;
use sea_orm::DatabaseConnection;

/// Cloned into every router that needs it; all fields are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: DatabaseConnection,
    pub jwt_auth: JwtAuth,
}
