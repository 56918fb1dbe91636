//! Post creation: generate draft content for a topic + platform and store
//! the post as pending review.

use chrono::{Datelike, Utc};
use tracing::{info, warn};

use super::{detached, with_gateway_timeout};
use crate::common::PlatformId;
use crate::domains::posts::error::{WorkflowError, WorkflowResult};
use crate::domains::posts::models::{Post, RecentPost};
use crate::kernel::ServerDeps;

/// How many recent posts are handed to the generator as dedup context.
const RECENT_CONTEXT_SIZE: usize = 10;

/// Generate content for an active platform and store the post in
/// `pending_review`. Text generation failure aborts creation entirely;
/// image generation failure is logged and the post is created without one.
///
/// With no explicit topic, the settings schedule supplies today's topic.
pub async fn create_post(
    deps: &ServerDeps,
    platform_id: PlatformId,
    topic: Option<String>,
) -> WorkflowResult<Post> {
    let deps = deps.clone();
    detached(async move { create_post_inner(&deps, platform_id, topic).await }).await
}

async fn create_post_inner(
    deps: &ServerDeps,
    platform_id: PlatformId,
    topic: Option<String>,
) -> WorkflowResult<Post> {
    let mut platform = deps
        .platforms
        .find(platform_id)
        .await
        .map_err(WorkflowError::persistence)?
        .ok_or_else(|| WorkflowError::configuration("platform not configured"))?;

    if !platform.active {
        return Err(WorkflowError::configuration(format!(
            "platform {} is inactive",
            platform.name
        )));
    }

    let topic = match topic.filter(|t| !t.trim().is_empty()) {
        Some(topic) => topic,
        None => {
            let settings = deps
                .settings
                .get_or_default()
                .await
                .map_err(WorkflowError::persistence)?;
            settings.topic_for(Utc::now().weekday()).to_string()
        }
    };

    // Advisory only: a repeated topic is worth a warning, but the sweep
    // reuses the scheduled topic across days, so repeats are legal.
    match deps.archive.is_duplicate_topic(&topic).await {
        Ok(true) => warn!(topic = %topic, "Topic was recently covered, generating anyway"),
        Ok(false) => {}
        Err(e) => warn!(error = %e, "Archive duplicate check unavailable"),
    }

    // Recent topics from our own store plus the external archive, so the
    // provider can steer away from repeats. Archive trouble is not fatal.
    let mut recent: Vec<RecentPost> = deps
        .posts
        .recent(RECENT_CONTEXT_SIZE)
        .await
        .map_err(WorkflowError::persistence)?
        .iter()
        .map(RecentPost::from)
        .collect();
    match deps.archive.recent_summaries(RECENT_CONTEXT_SIZE, 0).await {
        Ok(archived) => recent.extend(archived.into_iter().map(|a| RecentPost {
            topic: a.topic,
            excerpt: String::new(),
        })),
        Err(e) => warn!(error = %e, "Archive history unavailable, generating without it"),
    }

    // The archive can override a platform's formatting rules.
    match deps.archive.formatting_rules().await {
        Ok(rules) => {
            if let Some(text) = rules.get(&platform.name) {
                platform.format_requirements = text.clone();
            }
        }
        Err(e) => warn!(error = %e, "Archive formatting rules unavailable"),
    }

    let content = with_gateway_timeout(
        deps.gateway_timeout,
        deps.generator.generate_text(&platform, &topic, &recent),
    )
    .await
    .map_err(WorkflowError::generation)?;

    let mut post = Post::new(topic, content, platform.id);

    if platform.requires_image() {
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
                "Image generation failed, post created without an image"
            ),
        }
    }

    deps.posts
        .upsert(post.clone())
        .await
        .map_err(WorkflowError::persistence)?;

    info!(
        post_id = %post.id,
        platform = %platform.name,
        topic = %post.topic,
        "Post created, pending review"
    );

    Ok(post)
}
