//! Post repository seam (trait + in-memory implementation).

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::models::{Post, PostStatus};
use crate::common::PostId;

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Indexed lookup. Unknown IDs are an empty result, never an error.
    async fn find(&self, id: PostId) -> Result<Option<Post>>;

    /// All posts, newest first.
    async fn list(&self) -> Result<Vec<Post>>;

    /// Posts in a given status, newest first.
    async fn list_by_status(&self, status: PostStatus) -> Result<Vec<Post>>;

    /// The `limit` most recent posts (dedup context for generation).
    async fn recent(&self, limit: usize) -> Result<Vec<Post>>;

    /// Insert or replace (atomic per entity, last write wins).
    async fn upsert(&self, post: Post) -> Result<()>;

    /// Hard delete. Returns whether the post existed.
    async fn delete(&self, id: PostId) -> Result<bool>;

    async fn count(&self) -> Result<usize>;
}

/// In-memory post store.
#[derive(Default)]
pub struct InMemoryPostStore {
    inner: RwLock<HashMap<PostId, Post>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn find(&self, id: PostId) -> Result<Option<Post>> {
        Ok(self.inner.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self.inner.read().await.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn list_by_status(&self, status: PostStatus) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .inner
            .read()
            .await
            .values()
            .filter(|p| p.status == status)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Post>> {
        let mut posts = self.list().await?;
        posts.truncate(limit);
        Ok(posts)
    }

    async fn upsert(&self, post: Post) -> Result<()> {
        self.inner.write().await.insert(post.id, post);
        Ok(())
    }

    async fn delete(&self, id: PostId) -> Result<bool> {
        Ok(self.inner.write().await.remove(&id).is_some())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.inner.read().await.len())
    }
}
