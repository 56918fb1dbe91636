//! Approval and publishing: single-post approve-then-publish, and the
//! bulk fan-out over all approved posts.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use super::{detached, with_gateway_timeout};
use crate::common::PostId;
use crate::domains::posts::error::{WorkflowError, WorkflowResult};
use crate::domains::posts::models::{Post, PostStatus};
use crate::kernel::ServerDeps;

/// Approve a post and immediately attempt to publish it.
///
/// Approval is accepted from `pending_review`, `in_revision`, or `failed`
/// (re-approval is the only retry path for a failed publish). The publish
/// attempt records its outcome on the stored post before returning.
pub async fn approve_post(deps: &ServerDeps, post_id: PostId) -> WorkflowResult<Post> {
    let deps = deps.clone();
    detached(async move {
        let mut post = deps
            .posts
            .find(post_id)
            .await
            .map_err(WorkflowError::persistence)?
            .ok_or_else(|| WorkflowError::not_found(format!("post {post_id}")))?;

        if !post.status.accepts_approval() {
            return Err(WorkflowError::configuration(format!(
                "cannot approve a post in status {}",
                post.status
            )));
        }

        post.status = PostStatus::Approved;
        deps.posts
            .upsert(post.clone())
            .await
            .map_err(WorkflowError::persistence)?;

        attempt_publish(&deps, post_id).await
    })
    .await
}

/// Aggregate outcome of a bulk publish.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    pub published: usize,
    pub failed: usize,
}

/// Publish every approved post, each on its own task. One post's failure
/// never blocks or rolls back another's attempt; individual failures stay
/// recorded on the respective posts and the report carries the counts.
pub async fn publish_approved(deps: &ServerDeps) -> WorkflowResult<PublishReport> {
    let approved = deps
        .posts
        .list_by_status(PostStatus::Approved)
        .await
        .map_err(WorkflowError::persistence)?;

    let mut handles = Vec::with_capacity(approved.len());
    for post in &approved {
        let deps = deps.clone();
        let post_id = post.id;
        handles.push(tokio::spawn(
            async move { attempt_publish(&deps, post_id).await },
        ));
    }

    let mut published = 0;
    let mut failed = 0;
    for result in futures::future::join_all(handles).await {
        match result {
            Ok(Ok(post)) => {
                published += 1;
                info!(post_id = %post.id, "Published");
            }
            Ok(Err(e)) => {
                failed += 1;
                warn!(error = %e, "Publish attempt failed");
            }
            Err(e) => {
                failed += 1;
                tracing::error!(error = %e, "Publish task aborted");
            }
        }
    }

    info!(published, failed, "Bulk publish complete");
    Ok(PublishReport { published, failed })
}

/// One publish attempt for an approved post.
///
/// Configuration problems (unresolved platform, inactive, missing
/// credential) fail fast without touching the publishing gateway; the post
/// still moves to `failed`. The outcome is written to the store before the
/// error is surfaced.
pub(crate) async fn attempt_publish(deps: &ServerDeps, post_id: PostId) -> WorkflowResult<Post> {
    let post = deps
        .posts
        .find(post_id)
        .await
        .map_err(WorkflowError::persistence)?
        .ok_or_else(|| WorkflowError::not_found(format!("post {post_id}")))?;

    let platform = match post.platform_id {
        Some(platform_id) => deps
            .platforms
            .find(platform_id)
            .await
            .map_err(WorkflowError::persistence)?,
        None => None,
    };

    let Some(mut platform) = platform else {
        return fail_post(deps, post, WorkflowError::configuration("platform not configured"))
            .await;
    };

    if !platform.active {
        return fail_post(
            deps,
            post,
            WorkflowError::configuration(format!("platform {} is inactive", platform.name)),
        )
        .await;
    }
    if platform.credential_ref.is_none() {
        return fail_post(
            deps,
            post,
            WorkflowError::configuration(format!(
                "platform {} has no stored credentials",
                platform.name
            )),
        )
        .await;
    }

    match with_gateway_timeout(deps.gateway_timeout, deps.publisher.publish(&post, &platform))
        .await
    {
        Ok(()) => {
            let now = Utc::now();
            let mut post = post;
            post.status = PostStatus::Posted;
            post.posted_at = Some(now);
            deps.posts
                .upsert(post.clone())
                .await
                .map_err(WorkflowError::persistence)?;

            platform.last_post_at = Some(now);
            deps.platforms
                .upsert(platform.clone())
                .await
                .map_err(WorkflowError::persistence)?;

            if let Err(e) = deps
                .archive
                .append_summary(&platform.name, &post.topic, now)
                .await
            {
                warn!(post_id = %post.id, error = %e, "Archive append failed after publish");
            }

            info!(post_id = %post.id, platform = %platform.name, "Post published");
            Ok(post)
        }
        Err(e) => fail_post(deps, post, WorkflowError::publish(e)).await,
    }
}

/// Record a failed publish on the post, then surface the error.
async fn fail_post(
    deps: &ServerDeps,
    mut post: Post,
    err: WorkflowError,
) -> WorkflowResult<Post> {
    post.status = PostStatus::Failed;
    deps.posts
        .upsert(post.clone())
        .await
        .map_err(WorkflowError::persistence)?;
    warn!(post_id = %post.id, error = %err, "Publish failed");
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::platforms::models::Platform;
    use crate::kernel::test_dependencies::{MockPublisher, TestDependencies};

    fn credentialed(name: &str) -> Platform {
        let mut platform = Platform::new(name, "short text");
        platform.credential_ref = Some("cred-123".to_string());
        platform
    }

    async fn pending_post(deps: &ServerDeps, platform: &Platform, topic: &str) -> Post {
        let post = Post::new(topic, "content", platform.id);
        deps.posts.upsert(post.clone()).await.unwrap();
        post
    }

    #[tokio::test]
    async fn approve_publishes_and_stamps_both_sides() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.clone().into_deps();
        let platform = test_deps.seed_platform(&deps, credentialed("Facebook")).await;
        let post = pending_post(&deps, &platform, "Oil Change").await;

        let published = approve_post(&deps, post.id).await.unwrap();

        assert_eq!(published.status, PostStatus::Posted);
        assert!(published.posted_at.is_some());
        let stored_platform = deps.platforms.find(platform.id).await.unwrap().unwrap();
        assert!(stored_platform.last_post_at.is_some());
        assert!(test_deps.publisher.was_called_for(post.id));
        assert_eq!(
            test_deps.archive.appended(),
            vec![("Facebook".to_string(), "Oil Change".to_string())]
        );
    }

    #[tokio::test]
    async fn publish_failure_marks_failed_without_post_date() {
        let test_deps =
            TestDependencies::new().mock_publisher(MockPublisher::new().failing());
        let deps = test_deps.clone().into_deps();
        let platform = test_deps.seed_platform(&deps, credentialed("Facebook")).await;
        let post = pending_post(&deps, &platform, "Oil Change").await;

        let err = approve_post(&deps, post.id).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Publish(_)));

        let stored = deps.posts.find(post.id).await.unwrap().unwrap();
        assert_eq!(stored.status, PostStatus::Failed);
        assert!(stored.posted_at.is_none());
        let stored_platform = deps.platforms.find(platform.id).await.unwrap().unwrap();
        assert!(stored_platform.last_post_at.is_none());
    }

    #[tokio::test]
    async fn unresolved_platform_fails_without_calling_the_gateway() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.clone().into_deps();
        // Bound to a platform the registry has never seen.
        let orphan = Post::new("Oil Change", "content", crate::common::PlatformId::new());
        deps.posts.upsert(orphan.clone()).await.unwrap();

        let err = approve_post(&deps, orphan.id).await.unwrap_err();

        assert!(matches!(err, WorkflowError::Configuration(_)));
        let stored = deps.posts.find(orphan.id).await.unwrap().unwrap();
        assert_eq!(stored.status, PostStatus::Failed);
        assert_eq!(test_deps.publisher.calls().len(), 0);
    }

    #[tokio::test]
    async fn inactive_platform_is_never_published_to() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.clone().into_deps();
        let mut platform = credentialed("Facebook");
        platform.active = false;
        let platform = test_deps.seed_platform(&deps, platform).await;
        let post = pending_post(&deps, &platform, "Oil Change").await;

        let err = approve_post(&deps, post.id).await.unwrap_err();

        assert!(matches!(err, WorkflowError::Configuration(_)));
        assert_eq!(test_deps.publisher.calls().len(), 0);
        let stored = deps.posts.find(post.id).await.unwrap().unwrap();
        assert_eq!(stored.status, PostStatus::Failed);
    }

    #[tokio::test]
    async fn missing_credential_fails_fast() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.clone().into_deps();
        let platform = test_deps
            .seed_platform(&deps, Platform::new("Facebook", "short"))
            .await;
        let post = pending_post(&deps, &platform, "Oil Change").await;

        let err = approve_post(&deps, post.id).await.unwrap_err();

        assert!(matches!(err, WorkflowError::Configuration(_)));
        assert_eq!(test_deps.publisher.calls().len(), 0);
    }

    #[tokio::test]
    async fn failed_post_retries_via_re_approval() {
        let test_deps =
            TestDependencies::new().mock_publisher(MockPublisher::new().failing_once());
        let deps = test_deps.clone().into_deps();
        let platform = test_deps.seed_platform(&deps, credentialed("Facebook")).await;
        let post = pending_post(&deps, &platform, "Oil Change").await;

        approve_post(&deps, post.id).await.unwrap_err();
        let stored = deps.posts.find(post.id).await.unwrap().unwrap();
        assert_eq!(stored.status, PostStatus::Failed);

        let retried = approve_post(&deps, post.id).await.unwrap();
        assert_eq!(retried.status, PostStatus::Posted);
    }

    #[tokio::test]
    async fn bulk_publish_counts_successes_and_leaves_no_approved_posts() {
        let test_deps = TestDependencies::new()
            .mock_publisher(MockPublisher::new().with_failure_for_topic("Bad Topic"));
        let deps = test_deps.clone().into_deps();
        let platform = test_deps.seed_platform(&deps, credentialed("Facebook")).await;

        for topic in ["Oil Change", "Tire Rotation", "Bad Topic", "Brakes"] {
            let mut post = pending_post(&deps, &platform, topic).await;
            post.status = PostStatus::Approved;
            deps.posts.upsert(post).await.unwrap();
        }

        let report = publish_approved(&deps).await.unwrap();

        assert_eq!(report.published, 3);
        assert_eq!(report.failed, 1);
        assert!(deps
            .posts
            .list_by_status(PostStatus::Approved)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            deps.posts
                .list_by_status(PostStatus::Posted)
                .await
                .unwrap()
                .len(),
            3
        );
        assert_eq!(
            deps.posts
                .list_by_status(PostStatus::Failed)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn bulk_publish_with_nothing_approved_reports_zero() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.clone().into_deps();

        let report = publish_approved(&deps).await.unwrap();
        assert_eq!(report.published, 0);
        assert_eq!(report.failed, 0);
    }

    #[tokio::test]
    async fn dropped_caller_does_not_discard_a_completed_publish() {
        use std::sync::Arc;
        use std::time::Duration;
        use tokio::sync::Notify;

        let gate = Arc::new(Notify::new());
        let test_deps =
            TestDependencies::new().mock_publisher(MockPublisher::new().gated(gate.clone()));
        let deps = test_deps.clone().into_deps();
        let platform = test_deps.seed_platform(&deps, credentialed("Facebook")).await;
        let post = pending_post(&deps, &platform, "Oil Change").await;

        {
            let fut = approve_post(&deps, post.id);
            tokio::pin!(fut);
            // First poll spawns the workflow task; it then runs on its own.
            assert!(futures::poll!(fut.as_mut()).is_pending());
            while !test_deps.publisher.was_called_for(post.id) {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        } // caller gives up while the gateway call is in flight

        gate.notify_one();

        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        loop {
            let stored = deps.posts.find(post.id).await.unwrap().unwrap();
            if stored.status == PostStatus::Posted {
                assert!(stored.posted_at.is_some());
                break;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "publish outcome was discarded with its caller"
            );
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn approving_an_already_posted_post_is_rejected() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.clone().into_deps();
        let platform = test_deps.seed_platform(&deps, credentialed("Facebook")).await;
        let post = pending_post(&deps, &platform, "Oil Change").await;

        approve_post(&deps, post.id).await.unwrap();
        let err = approve_post(&deps, post.id).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Configuration(_)));
        // The gateway saw exactly one delivery.
        assert_eq!(test_deps.publisher.calls().len(), 1);
    }
}
