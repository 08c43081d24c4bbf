use axum::Router;
use domain_catalog::{PgCategoryRepository, PgCityRepository, PgProductRepository, handlers};

use crate::state::AppState;

pub mod health;

/// Catalog routes backed by Postgres, mounted at the server root.
///
/// The returned router is stateless: every sub-router already has its
/// service applied.
pub fn routes(state: &AppState) -> Router {
    handlers::router(
        PgProductRepository::new(state.db.clone()),
        PgCityRepository::new(state.db.clone()),
        PgCategoryRepository::new(state.db.clone()),
        state.jwt_auth.clone(),
    )
}

/// `/ready`, with state applied so it merges into the stateless app router.
pub fn ready_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
