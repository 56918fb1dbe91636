//! Platform repository seam.
//!
//! Persistence proper is an external collaborator; the workflow only needs
//! indexed lookups and atomic single-entity writes, so the store is a trait
//! with an in-memory implementation behind a `tokio::sync::RwLock`.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::models::Platform;
use crate::common::PlatformId;

#[async_trait]
pub trait PlatformStore: Send + Sync {
    /// Indexed lookup. Unknown IDs are an empty result, never an error.
    async fn find(&self, id: PlatformId) -> Result<Option<Platform>>;

    /// All platforms, ordered by creation.
    async fn list(&self) -> Result<Vec<Platform>>;

    /// Insert or replace (atomic per entity, last write wins).
    async fn upsert(&self, platform: Platform) -> Result<()>;

    async fn count(&self) -> Result<usize>;
}

/// In-memory platform store.
#[derive(Default)]
pub struct InMemoryPlatformStore {
    inner: RwLock<HashMap<PlatformId, Platform>>,
}

impl InMemoryPlatformStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlatformStore for InMemoryPlatformStore {
    async fn find(&self, id: PlatformId) -> Result<Option<Platform>> {
        Ok(self.inner.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Platform>> {
        let mut platforms: Vec<Platform> = self.inner.read().await.values().cloned().collect();
        platforms.sort_by_key(|p| p.id);
        Ok(platforms)
    }

    async fn upsert(&self, platform: Platform) -> Result<()> {
        self.inner.write().await.insert(platform.id, platform);
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.inner.read().await.len())
    }
}
