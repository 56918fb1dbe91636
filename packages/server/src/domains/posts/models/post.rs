use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{PlatformId, PostId};

/// Post - one unit of content bound to exactly one platform, carrying its
/// review lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub topic: String,
    /// Generated or user-edited text
    pub content: String,
    /// Raw generated image bytes, if the platform wants one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Vec<u8>>,
    pub image_url: Option<String>,
    /// Bound platform. Unbound is tolerated in storage but fails at publish
    /// time with a configuration error.
    pub platform_id: Option<PlatformId>,
    pub status: PostStatus,
    /// Most recent reviewer feedback, kept for the revision prompt
    pub last_feedback: Option<String>,
    /// Research sources consulted during generation (duplicates allowed)
    pub source_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub posted_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn new(topic: impl Into<String>, content: impl Into<String>, platform_id: PlatformId) -> Self {
        Self {
            id: PostId::new(),
            topic: topic.into(),
            content: content.into(),
            image: None,
            image_url: None,
            platform_id: Some(platform_id),
            status: PostStatus::PendingReview,
            last_feedback: None,
            source_urls: Vec::new(),
            created_at: Utc::now(),
            posted_at: None,
        }
    }

    /// Short excerpt of the content, used as dedup context for generation.
    pub fn excerpt(&self, max_chars: usize) -> String {
        self.content.chars().take(max_chars).collect()
    }
}

/// Review lifecycle state.
///
/// ```text
/// (generate) ──► PendingReview ◄──► InRevision
///                     │                 │
///                     └──── approve ────┘
///                              │
///                          Approved ──► Posted
///                              │           ▲
///                              └──► Failed ┘ (manual re-approval only)
/// ```
///
/// `Posted` and `Failed` are terminal; a failed post is retried only by the
/// user approving it again.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Draft,
    PendingReview,
    InRevision,
    Approved,
    Posted,
    Failed,
}

impl PostStatus {
    /// Whether a reviewer may submit feedback in this state.
    pub fn accepts_feedback(&self) -> bool {
        matches!(self, PostStatus::PendingReview | PostStatus::InRevision)
    }

    /// Whether the user may approve from this state. `Failed` is included:
    /// re-approval is the only retry path for a failed publish.
    pub fn accepts_approval(&self) -> bool {
        matches!(
            self,
            PostStatus::PendingReview | PostStatus::InRevision | PostStatus::Failed
        )
    }

    /// Terminal states never transition again (except Failed via re-approval).
    pub fn is_terminal(&self) -> bool {
        matches!(self, PostStatus::Posted | PostStatus::Failed)
    }

    /// Legal transitions of the review state machine. Monotonic along the
    /// approval path, with the PendingReview <-> InRevision loop and the
    /// Failed -> Approved manual retry as the only cycles.
    pub fn can_transition_to(&self, next: PostStatus) -> bool {
        use PostStatus::*;
        matches!(
            (self, next),
            (Draft, PendingReview)
                | (PendingReview, InRevision)
                | (InRevision, InRevision)
                | (InRevision, PendingReview)
                | (PendingReview, Approved)
                | (InRevision, Approved)
                | (Failed, Approved)
                | (Approved, Posted)
                | (Approved, Failed)
        )
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostStatus::Draft => write!(f, "draft"),
            PostStatus::PendingReview => write!(f, "pending_review"),
            PostStatus::InRevision => write!(f, "in_revision"),
            PostStatus::Approved => write!(f, "approved"),
            PostStatus::Posted => write!(f, "posted"),
            PostStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for PostStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "pending_review" => Ok(PostStatus::PendingReview),
            "in_revision" => Ok(PostStatus::InRevision),
            "approved" => Ok(PostStatus::Approved),
            "posted" => Ok(PostStatus::Posted),
            "failed" => Ok(PostStatus::Failed),
            _ => Err(anyhow::anyhow!("Invalid post status: {}", s)),
        }
    }
}

/// (topic, excerpt) pair handed to the generation gateway so the provider
/// can avoid repeating recent topics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentPost {
    pub topic: String,
    pub excerpt: String,
}

impl From<&Post> for RecentPost {
    fn from(post: &Post) -> Self {
        Self {
            topic: post.topic.clone(),
            excerpt: post.excerpt(120),
        }
    }
}
