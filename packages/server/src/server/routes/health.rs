use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::kernel::ServerDeps;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    platforms: usize,
    posts: usize,
}

/// Health check endpoint. Reports store counts so a probe can tell an empty
/// process from a broken one.
pub async fn health_handler(
    Extension(deps): Extension<ServerDeps>,
) -> (StatusCode, Json<HealthResponse>) {
    let platforms = deps.platforms.count().await.unwrap_or(0);
    let posts = deps.posts.count().await.unwrap_or(0);

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            platforms,
            posts,
        }),
    )
}
