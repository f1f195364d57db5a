//! API route configuration.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))

        // Characters
        .route("/api/characters", get(handlers::list_characters))
        .route("/api/characters/search", get(handlers::search_characters))
        .route("/api/characters/cache/clear", post(handlers::clear_cache))
        .route("/api/characters/:id", get(handlers::get_character))

        .fallback(handlers::not_found)
        .with_state(state)
}
