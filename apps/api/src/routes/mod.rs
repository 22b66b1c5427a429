pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::ai::handlers as ai;
use crate::auth::middleware::require_auth;
use crate::creations::handlers as creations;
use crate::state::AppState;

/// Upper bound for any request body. Well above the 5MB resume cap so oversized
/// resumes reach the handler and get the envelope instead of a bare 413.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let ai_routes = Router::new()
        .route("/generate-article", post(ai::handle_generate_article))
        .route("/generate-blog-title", post(ai::handle_generate_blog_title))
        .route("/generate-image", post(ai::handle_generate_image))
        .route(
            "/remove-image-background",
            post(ai::handle_remove_image_background),
        )
        .route("/remove-image-object", post(ai::handle_remove_image_object))
        .route("/resume-review", post(ai::handle_resume_review));

    let user_routes = Router::new()
        .route(
            "/get-user-creations",
            get(creations::handle_get_user_creations),
        )
        .route(
            "/get-published-creations",
            get(creations::handle_get_published_creations),
        );

    // Everything under /api requires a session
    let api = Router::new()
        .nest("/ai", ai_routes)
        .nest("/user", user_routes)
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/", get(health::liveness_handler))
        .route("/health", get(health::health_handler))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
