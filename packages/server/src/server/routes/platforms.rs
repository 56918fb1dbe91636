//! Platform management endpoints.

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Deserializer};

use crate::common::PlatformId;
use crate::domains::platforms::activities::{create_platform, update_platform};
use crate::domains::platforms::models::{Platform, UpdatePlatformParams};
use crate::domains::posts::error::WorkflowError;
use crate::kernel::ServerDeps;
use crate::server::error::ApiResult;
use uuid::Uuid;

pub async fn list_platforms_handler(
    Extension(deps): Extension<ServerDeps>,
) -> ApiResult<Json<Vec<Platform>>> {
    let platforms = deps
        .platforms
        .list()
        .await
        .map_err(WorkflowError::persistence)?;
    Ok(Json(platforms))
}

#[derive(Deserialize)]
pub struct CreatePlatformRequest {
    pub name: String,
    pub format_requirements: String,
}

pub async fn create_platform_handler(
    Extension(deps): Extension<ServerDeps>,
    Json(request): Json<CreatePlatformRequest>,
) -> ApiResult<(StatusCode, Json<Platform>)> {
    let platform = create_platform(
        deps.platforms.as_ref(),
        request.name,
        request.format_requirements,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(platform)))
}

/// Distinguishes an absent field from an explicit `null`: absent leaves the
/// value unchanged, `"credential_ref": null` clears it.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize, Default)]
pub struct UpdatePlatformRequest {
    pub name: Option<String>,
    pub active: Option<bool>,
    pub format_requirements: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub credential_ref: Option<Option<String>>,
}

pub async fn update_platform_handler(
    Extension(deps): Extension<ServerDeps>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePlatformRequest>,
) -> ApiResult<Json<Platform>> {
    let params = UpdatePlatformParams::builder()
        .name(request.name)
        .active(request.active)
        .format_requirements(request.format_requirements)
        .credential_ref(request.credential_ref)
        .build();

    let platform = update_platform(deps.platforms.as_ref(), PlatformId::from(id), params).await?;
    Ok(Json(platform))
}
