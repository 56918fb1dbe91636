//! Typed ID definitions for all domain entities.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Platform entities (social media destinations).
pub struct Platform;

/// Marker type for Post entities (content items in the review workflow).
pub struct Post;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for Platform entities.
pub type PlatformId = Id<Platform>;

/// Typed ID for Post entities.
pub type PostId = Id<Post>;
