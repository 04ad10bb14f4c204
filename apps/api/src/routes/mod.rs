pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers as generation;
use crate::image::handlers as image;
use crate::publish::handlers as publish;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Form vocabularies
        .route("/api/v1/taxonomy", get(generation::handle_taxonomy))
        // Reference selection + haiku generation
        .route(
            "/api/v1/references",
            post(generation::handle_select_references),
        )
        .route("/api/v1/haiku", post(generation::handle_generate_haiku))
        .route(
            "/api/v1/haiku/translation",
            post(generation::handle_translate),
        )
        // Illustration
        .route(
            "/api/v1/illustrations",
            post(image::handle_generate_illustration),
        )
        .route(
            "/api/v1/illustrations/caption",
            post(image::handle_caption_illustration),
        )
        // Publishing
        .route("/api/v1/posts", post(publish::handle_publish))
        .with_state(state)
}
