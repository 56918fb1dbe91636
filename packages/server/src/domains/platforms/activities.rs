//! Platform registry operations.

use tracing::info;

use crate::common::PlatformId;
use crate::domains::platforms::models::{Platform, UpdatePlatformParams};
use crate::domains::platforms::store::PlatformStore;
use crate::domains::posts::error::{WorkflowError, WorkflowResult};

/// Seed the fixed default platform set on first run. Returns the number of
/// platforms created (zero when the registry is already populated).
pub async fn ensure_default_platforms(store: &dyn PlatformStore) -> anyhow::Result<usize> {
    if store.count().await? > 0 {
        return Ok(0);
    }

    let defaults = Platform::default_set();
    let seeded = defaults.len();
    for platform in defaults {
        store.upsert(platform).await?;
    }
    info!(seeded, "Seeded default platform set");
    Ok(seeded)
}

pub async fn create_platform(
    store: &dyn PlatformStore,
    name: String,
    format_requirements: String,
) -> WorkflowResult<Platform> {
    let platform = Platform::new(name, format_requirements);
    store
        .upsert(platform.clone())
        .await
        .map_err(WorkflowError::persistence)?;
    info!(platform_id = %platform.id, name = %platform.name, "Platform created");
    Ok(platform)
}

/// Apply a partial update (toggle active, rotate credentials, edit format
/// requirements). The ID is immutable; platforms are never hard-deleted.
pub async fn update_platform(
    store: &dyn PlatformStore,
    platform_id: PlatformId,
    params: UpdatePlatformParams,
) -> WorkflowResult<Platform> {
    let mut platform = store
        .find(platform_id)
        .await
        .map_err(WorkflowError::persistence)?
        .ok_or_else(|| WorkflowError::not_found(format!("platform {platform_id}")))?;

    platform.apply(params);
    store
        .upsert(platform.clone())
        .await
        .map_err(WorkflowError::persistence)?;
    Ok(platform)
}
