//! Revision loop: reviewer feedback sends a post to `in_revision` and the
//! generation gateway produces revised content.

use tracing::{info, warn};

use super::{detached, with_gateway_timeout};
use crate::common::PostId;
use crate::domains::posts::error::{WorkflowError, WorkflowResult};
use crate::domains::posts::models::{Post, PostStatus};
use crate::kernel::ServerDeps;

/// Store reviewer feedback and produce revised content.
///
/// Blank feedback is rejected outright: no transition, no gateway call.
/// The feedback and the `in_revision` status are persisted before the
/// gateway call, so a refine failure leaves the post in revision with the
/// feedback on record; re-submitting retries. If the platform wants an
/// image, regeneration is attempted after a successful revision - an image
/// failure never fails the revision.
pub async fn submit_feedback(
    deps: &ServerDeps,
    post_id: PostId,
    feedback: String,
) -> WorkflowResult<Post> {
    let deps = deps.clone();
    detached(async move { submit_feedback_inner(&deps, post_id, feedback).await }).await
}

async fn submit_feedback_inner(
    deps: &ServerDeps,
    post_id: PostId,
    feedback: String,
) -> WorkflowResult<Post> {
    if feedback.trim().is_empty() {
        return Err(WorkflowError::configuration("feedback must not be empty"));
    }

    let mut post = deps
        .posts
        .find(post_id)
        .await
        .map_err(WorkflowError::persistence)?
        .ok_or_else(|| WorkflowError::not_found(format!("post {post_id}")))?;

    if !post.status.accepts_feedback() {
        return Err(WorkflowError::configuration(format!(
            "cannot revise a post in status {}",
            post.status
        )));
    }

    post.last_feedback = Some(feedback.clone());
    post.status = PostStatus::InRevision;
    deps.posts
        .upsert(post.clone())
        .await
        .map_err(WorkflowError::persistence)?;

    let revised = with_gateway_timeout(deps.gateway_timeout, deps.generator.refine(&post, &feedback))
        .await
        .map_err(WorkflowError::generation)?;
    post.content = revised;

    if let Some(platform_id) = post.platform_id {
        match deps.platforms.find(platform_id).await {
            Ok(Some(platform)) if platform.requires_image() => {
                match with_gateway_timeout(
                    deps.gateway_timeout,
                    deps.generator.generate_image(&post, &platform),
                )
                .await
                {
                    Ok(bytes) => post.image = Some(bytes),
                    Err(e) => warn!(
                        post_id = %post.id,
                        error = %e,
                        "Image regeneration failed, revision keeps the old image"
                    ),
                }
            }
            Ok(_) => {}
            Err(e) => warn!(
                post_id = %post.id,
                error = %e,
                "Platform lookup failed during revision, skipping image"
            ),
        }
    }

    deps.posts
        .upsert(post.clone())
        .await
        .map_err(WorkflowError::persistence)?;

    info!(post_id = %post.id, "Revision applied");
    Ok(post)
}
