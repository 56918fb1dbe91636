// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic. The review
// workflow (domains/posts/activities) decides when to call them and what a
// failure means; implementations only talk to the outside world.
//
// Naming convention: Base* for trait names (e.g. BaseContentGenerator)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::domains::platforms::models::Platform;
use crate::domains::posts::models::{Post, RecentPost};

// =============================================================================
// Content Generation Gateway (AI text/images)
// =============================================================================

#[async_trait]
pub trait BaseContentGenerator: Send + Sync {
    /// Generate draft text for a topic on a platform. `recent` carries
    /// (topic, excerpt) pairs of recent posts so the provider can avoid
    /// repeating topics.
    async fn generate_text(
        &self,
        platform: &Platform,
        topic: &str,
        recent: &[RecentPost],
    ) -> Result<String>;

    /// Generate an image for a post. Only called for platforms whose format
    /// requirements ask for one.
    async fn generate_image(&self, post: &Post, platform: &Platform) -> Result<Vec<u8>>;

    /// Revise existing content from reviewer feedback.
    async fn refine(&self, post: &Post, feedback: &str) -> Result<String>;
}

// =============================================================================
// Publishing Gateway
// =============================================================================

#[async_trait]
pub trait BasePublisher: Send + Sync {
    /// Deliver a post to its platform. Any error is a uniform publish
    /// failure; the workflow does not distinguish transient from permanent.
    async fn publish(&self, post: &Post, platform: &Platform) -> Result<()>;
}

// =============================================================================
// Post Archive (document/sheet collaborator)
// =============================================================================

/// One row of the published-post archive.
#[derive(Debug, Clone)]
pub struct ArchivedPost {
    pub platform: String,
    pub topic: String,
    pub posted_at: DateTime<Utc>,
}

#[async_trait]
pub trait BasePostArchive: Send + Sync {
    /// Platform name -> formatting rules text.
    async fn formatting_rules(&self) -> Result<HashMap<String, String>>;

    /// Whether a topic was recently covered.
    async fn is_duplicate_topic(&self, topic: &str) -> Result<bool>;

    /// Append a published post's summary to the archive.
    async fn append_summary(
        &self,
        platform: &str,
        topic: &str,
        posted_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Paginated read of recent post summaries, newest first.
    async fn recent_summaries(&self, limit: usize, offset: usize) -> Result<Vec<ArchivedPost>>;
}
