//! Post lifecycle endpoints: generation, review, approval, and publishing.

use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::Json;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{PlatformId, PostId};
use crate::domains::posts::activities::{
    approve_post, create_post, delete_post, get_post, list_posts, publish_approved,
    submit_feedback, PublishReport,
};
use crate::domains::posts::error::WorkflowError;
use crate::domains::posts::models::{Post, PostStatus};
use crate::kernel::ServerDeps;
use crate::server::error::ApiResult;

#[derive(Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub topic: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_b64: Option<String>,
    pub image_url: Option<String>,
    pub platform_id: Option<Uuid>,
    pub status: PostStatus,
    pub last_feedback: Option<String>,
    pub source_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub posted_at: Option<DateTime<Utc>>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: *post.id.as_uuid(),
            topic: post.topic,
            content: post.content,
            image_b64: post.image.map(|bytes| BASE64.encode(bytes)),
            image_url: post.image_url,
            platform_id: post.platform_id.map(|id| *id.as_uuid()),
            status: post.status,
            last_feedback: post.last_feedback,
            source_urls: post.source_urls,
            created_at: post.created_at,
            posted_at: post.posted_at,
        }
    }
}

#[derive(Deserialize)]
pub struct ListPostsQuery {
    pub status: Option<String>,
}

pub async fn list_posts_handler(
    Extension(deps): Extension<ServerDeps>,
    Query(query): Query<ListPostsQuery>,
) -> ApiResult<Json<Vec<PostResponse>>> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<PostStatus>)
        .transpose()
        .map_err(|e| WorkflowError::configuration(e.to_string()))?;

    let posts = list_posts(&deps, status).await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

pub async fn get_post_handler(
    Extension(deps): Extension<ServerDeps>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PostResponse>> {
    let post = get_post(&deps, PostId::from(id)).await?;
    Ok(Json(post.into()))
}

pub async fn delete_post_handler(
    Extension(deps): Extension<ServerDeps>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    delete_post(&deps, PostId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct GeneratePostRequest {
    pub platform_id: Uuid,
    /// Absent means "use today's scheduled topic from settings"
    pub topic: Option<String>,
}

pub async fn generate_post_handler(
    Extension(deps): Extension<ServerDeps>,
    Json(request): Json<GeneratePostRequest>,
) -> ApiResult<(StatusCode, Json<PostResponse>)> {
    let post = create_post(&deps, PlatformId::from(request.platform_id), request.topic).await?;
    Ok((StatusCode::CREATED, Json(post.into())))
}

#[derive(Deserialize)]
pub struct FeedbackRequest {
    pub feedback: String,
}

pub async fn feedback_handler(
    Extension(deps): Extension<ServerDeps>,
    Path(id): Path<Uuid>,
    Json(request): Json<FeedbackRequest>,
) -> ApiResult<Json<PostResponse>> {
    let post = submit_feedback(&deps, PostId::from(id), request.feedback).await?;
    Ok(Json(post.into()))
}

pub async fn approve_handler(
    Extension(deps): Extension<ServerDeps>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PostResponse>> {
    let post = approve_post(&deps, PostId::from(id)).await?;
    Ok(Json(post.into()))
}

pub async fn publish_approved_handler(
    Extension(deps): Extension<ServerDeps>,
) -> ApiResult<Json<PublishReport>> {
    let report = publish_approved(&deps).await?;
    Ok(Json(report))
}
