//! API layer - HTTP-specific interface over the core modules.
//!
//! This module owns the route table, the shared application state handed
//! to every handler, and the request extractors. Handlers stay thin: they
//! check the caller's capability, delegate to `core`, and shape the
//! response body.

/// Authentication and body extractors
pub mod extract;
/// Request handlers grouped by resource
pub mod routes;

use crate::config::AppConfig;
use axum::{
    Router,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection for all database operations
    pub db: DatabaseConnection,
    pub config: AppConfig,
}

/// Builds the full route table over the given state.
///
/// Paths follow the public API contract: resource collections and single
/// records carry a trailing slash; the token refresh path does not.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/auth/login/", post(routes::auth::login))
        .route("/auth/token/refresh", post(routes::auth::refresh))
        .route(
            "/roles/",
            get(routes::roles::list).post(routes::roles::create),
        )
        .route(
            "/roles/:id/",
            get(routes::roles::retrieve)
                .put(routes::roles::update)
                .delete(routes::roles::destroy),
        )
        .route("/users/register/", post(routes::users::register))
        .route("/users/", get(routes::users::list))
        .route(
            "/users/:id/",
            get(routes::users::retrieve)
                .put(routes::users::update)
                .delete(routes::users::destroy),
        )
        .route(
            "/restaurant/",
            get(routes::restaurants::list).post(routes::restaurants::create),
        )
        .route(
            "/restaurant/:id/",
            get(routes::restaurants::retrieve)
                .put(routes::restaurants::update)
                .delete(routes::restaurants::destroy),
        )
        .route(
            "/restaurant/food-item/",
            get(routes::food_items::list).post(routes::food_items::create),
        )
        .route(
            "/restaurant/food-item/:id/",
            get(routes::food_items::retrieve).put(routes::food_items::update),
        )
        .route(
            "/restaurant/menu/",
            get(routes::menus::list).post(routes::menus::create),
        )
        .route(
            "/restaurant/menu/:id/",
            get(routes::menus::retrieve).put(routes::menus::update),
        )
        .route(
            "/restaurant/menu/current-day/",
            get(routes::menus::current_day),
        )
        .route("/vote/current-day/", post(routes::votes::create))
        .route(
            "/vote/current-day-votes/",
            get(routes::votes::current_day_votes),
        )
        .route(
            "/vote/current-day-result/",
            get(routes::votes::current_day_result),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
