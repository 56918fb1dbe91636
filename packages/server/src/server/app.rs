//! Application setup and router configuration.

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{
    approve_handler, create_platform_handler, delete_post_handler, feedback_handler,
    generate_post_handler, get_post_handler, get_settings_handler, health_handler,
    list_platforms_handler, list_posts_handler, publish_approved_handler, put_settings_handler,
    update_platform_handler,
};

/// Build the Axum application router over a fully-wired `ServerDeps`.
pub fn build_app(deps: ServerDeps) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/posts", get(list_posts_handler))
        .route("/posts/generate", post(generate_post_handler))
        .route("/posts/publish-approved", post(publish_approved_handler))
        .route(
            "/posts/:id",
            get(get_post_handler).delete(delete_post_handler),
        )
        .route("/posts/:id/feedback", post(feedback_handler))
        .route("/posts/:id/approve", post(approve_handler))
        .route(
            "/platforms",
            get(list_platforms_handler).post(create_platform_handler),
        )
        .route("/platforms/:id", patch(update_platform_handler))
        .route(
            "/settings",
            get(get_settings_handler).put(put_settings_handler),
        )
        .layer(Extension(deps))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
