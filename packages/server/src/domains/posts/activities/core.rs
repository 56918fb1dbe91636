//! Queries and deletion for posts in the review pipeline.

use tracing::info;

use crate::common::PostId;
use crate::domains::posts::error::{WorkflowError, WorkflowResult};
use crate::domains::posts::models::{Post, PostStatus};
use crate::kernel::ServerDeps;

pub async fn get_post(deps: &ServerDeps, post_id: PostId) -> WorkflowResult<Post> {
    deps.posts
        .find(post_id)
        .await
        .map_err(WorkflowError::persistence)?
        .ok_or_else(|| WorkflowError::not_found(format!("post {post_id}")))
}

pub async fn list_posts(
    deps: &ServerDeps,
    status: Option<PostStatus>,
) -> WorkflowResult<Vec<Post>> {
    match status {
        Some(status) => deps.posts.list_by_status(status).await,
        None => deps.posts.list().await,
    }
    .map_err(WorkflowError::persistence)
}

/// Hard delete a post from the pending list. Terminal posts (`posted`,
/// `failed`) are part of the historical record and stay.
pub async fn delete_post(deps: &ServerDeps, post_id: PostId) -> WorkflowResult<()> {
    let post = get_post(deps, post_id).await?;

    if post.status.is_terminal() {
        return Err(WorkflowError::configuration(format!(
            "cannot delete a post in terminal status {}",
            post.status
        )));
    }

    deps.posts
        .delete(post_id)
        .await
        .map_err(WorkflowError::persistence)?;
    info!(post_id = %post_id, "Post deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PlatformId;
    use crate::kernel::test_dependencies::TestDependencies;

    #[tokio::test]
    async fn delete_removes_pending_post() {
        let deps = TestDependencies::new().into_deps();
        let post = Post::new("Oil Change", "content", PlatformId::new());
        deps.posts.upsert(post.clone()).await.unwrap();

        delete_post(&deps, post.id).await.unwrap();

        assert!(matches!(
            get_post(&deps, post.id).await.unwrap_err(),
            WorkflowError::NotFound(_)
        ));
        assert!(list_posts(&deps, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_rejects_terminal_posts() {
        let deps = TestDependencies::new().into_deps();
        let mut post = Post::new("Oil Change", "content", PlatformId::new());
        post.status = PostStatus::Posted;
        deps.posts.upsert(post.clone()).await.unwrap();

        let err = delete_post(&deps, post.id).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Configuration(_)));
        assert!(get_post(&deps, post.id).await.is_ok());
    }

    #[tokio::test]
    async fn delete_of_unknown_post_is_not_found() {
        let deps = TestDependencies::new().into_deps();
        let err = delete_post(&deps, PostId::new()).await.unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_filters_by_status() {
        let deps = TestDependencies::new().into_deps();
        let pending = Post::new("a", "content", PlatformId::new());
        let mut posted = Post::new("b", "content", PlatformId::new());
        posted.status = PostStatus::Posted;
        deps.posts.upsert(pending).await.unwrap();
        deps.posts.upsert(posted).await.unwrap();

        assert_eq!(list_posts(&deps, None).await.unwrap().len(), 2);
        assert_eq!(
            list_posts(&deps, Some(PostStatus::Posted))
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
