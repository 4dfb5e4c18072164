use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use super::AppState;

/// Build the full application [`Router`], shared by the binary and the tests.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::home))
        .route("/stories", get(routes::list_stories))
        .route("/save-story", post(routes::save_story))
        .route("/delete-story/{story_id}", delete(routes::delete_story))
        .route("/generate-story", post(routes::generate_story))
        .layer(TraceLayer::new_for_http())
        // Browser front-ends are served from arbitrary origins.
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}
