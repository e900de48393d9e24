//! Axum router construction.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete router.
///
/// `/next_action` and `/messages` also answer with a trailing slash, which
/// existing game clients send.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/next_action", post(handlers::next_action))
        .route("/next_action/", post(handlers::next_action))
        .route("/new_game", post(handlers::new_game))
        .route("/memory", get(handlers::get_memory))
        .route("/records/{name}", get(handlers::get_record))
        .route("/messages", get(handlers::get_messages))
        .route("/messages/", get(handlers::get_messages))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
